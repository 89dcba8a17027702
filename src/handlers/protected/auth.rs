use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::middleware::{AdminSession, ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub new_username: String,
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DisableRequest {
    pub password: String,
}

/// POST /api/admin/auth/change - Replace username and password
///
/// 403 when the old password is wrong, 400 when the new password is too weak.
/// Outstanding tokens stay valid.
pub async fn change(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(req): Json<ChangeRequest>,
) -> ApiResult<Value> {
    state
        .auth
        .change_credentials(
            &session.token,
            &req.new_username,
            &req.old_password,
            &req.new_password,
        )
        .await?;
    Ok(ApiResponse::empty())
}

/// POST /api/admin/auth/revoke - Log out every session, the caller's included
pub async fn revoke(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> ApiResult<Value> {
    state.auth.revoke_all(&session.token).await?;
    Ok(ApiResponse::empty())
}

/// POST /api/admin/auth/disable - Turn logins off until the next first run
pub async fn disable(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    Json(req): Json<DisableRequest>,
) -> ApiResult<Value> {
    state.auth.disable(&session.token, &req.password).await?;
    Ok(ApiResponse::empty())
}
