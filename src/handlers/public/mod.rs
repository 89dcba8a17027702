// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Read-only data access, first-time setup and token acquisition.
pub mod admin;
pub mod auth;
pub mod config;
pub mod group;

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /health - Liveness and data root status
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "initialized": state.data.is_initialized().await,
    })))
}
