use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::data::{ClassifierInfo, GroupBrief, GroupInfo};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/group - Slugs of every group in the data root
///
/// Expected Output:
/// ```json
/// { "success": true, "data": { "groups": ["languages", "projects"] } }
/// ```
pub async fn group_list(State(state): State<AppState>) -> ApiResult<Value> {
    let groups = state.groups.list().await?;
    Ok(ApiResponse::success(json!({ "groups": groups })))
}

/// GET /api/group/:group_id/info - Full group definition
pub async fn info_get(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> ApiResult<GroupInfo> {
    Ok(ApiResponse::success(state.groups.get_info(&group_id).await?))
}

/// GET /api/group/:group_id/brief - Name, description and color only
pub async fn brief_get(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> ApiResult<GroupBrief> {
    Ok(ApiResponse::success(state.groups.get_brief(&group_id).await?))
}

pub async fn readme_get(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> ApiResult<Value> {
    let readme = state.groups.get_readme(&group_id).await?;
    Ok(ApiResponse::success(json!({ "readme": readme })))
}

/// GET /api/group/:group_id/classifier - Slugs of the group's classifiers
pub async fn classifier_list(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> ApiResult<Value> {
    let classifiers = state.classifiers.list(&group_id).await?;
    Ok(ApiResponse::success(json!({ "classifiers": classifiers })))
}

pub async fn classifier_info_get(
    State(state): State<AppState>,
    Path((group_id, classifier_id)): Path<(String, String)>,
) -> ApiResult<ClassifierInfo> {
    let info = state.classifiers.get_info(&group_id, &classifier_id).await?;
    Ok(ApiResponse::success(info))
}

pub async fn classifier_readme_get(
    State(state): State<AppState>,
    Path((group_id, classifier_id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let readme = state.classifiers.get_readme(&group_id, &classifier_id).await?;
    Ok(ApiResponse::success(json!({ "readme": readme })))
}
