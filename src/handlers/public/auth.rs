use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{extract_bearer_token, ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/admin/auth/login - Exchange credentials for a bearer token
///
/// Wrong username and wrong password answer with the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Value> {
    let token = state.auth.login(&req.username, &req.password).await?;
    Ok(ApiResponse::success(json!({ "token": token })))
}

/// POST /api/admin/auth/logout - Invalidate the caller's token
///
/// Always succeeds, whether or not the token was live.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Value> {
    if let Ok(token) = extract_bearer_token(&headers) {
        state.auth.logout(&token).await;
    }
    Ok(ApiResponse::empty())
}
