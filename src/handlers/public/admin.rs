use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::app::AppState;
use crate::auth::FirstRunCredentials;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    pub repo_url: String,
    pub branch: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstRunRequest {
    pub repo_url: Option<String>,
    pub branch: Option<String>,
}

/// POST /api/admin/setup - Clone the portfolio repository into the data root
///
/// Refused with 403 once the data root is initialized. A repository whose
/// content is not portfolio data is removed again and answers 400.
pub async fn setup(
    State(state): State<AppState>,
    Json(req): Json<SetupRequest>,
) -> ApiResult<Value> {
    state
        .bootstrap
        .setup(&req.repo_url, req.branch.as_deref())
        .await?;
    info!("Data repository set up from {}", req.repo_url);
    Ok(ApiResponse::empty())
}

/// POST /api/admin/firstrun - Initialize the data root and provision the
/// administrator
///
/// Expected Output:
/// ```json
/// { "success": true, "data": { "username": "admin", "password": "...", "token": "..." } }
/// ```
pub async fn firstrun(
    State(state): State<AppState>,
    body: Option<Json<FirstRunRequest>>,
) -> ApiResult<FirstRunCredentials> {
    let Json(req) = body.unwrap_or_default();
    let creds = state
        .auth
        .first_run(req.repo_url.as_deref(), req.branch.as_deref())
        .await?;
    Ok(ApiResponse::success(creds))
}
