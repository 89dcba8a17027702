use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::data::PortfolioConfig;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/config - Portfolio-wide settings
pub async fn config_get(State(state): State<AppState>) -> ApiResult<PortfolioConfig> {
    Ok(ApiResponse::success(state.portfolio.get_config().await?))
}

/// GET /api/config/readme
pub async fn readme_get(State(state): State<AppState>) -> ApiResult<Value> {
    let readme = state.portfolio.get_readme().await?;
    Ok(ApiResponse::success(json!({ "readme": readme })))
}
