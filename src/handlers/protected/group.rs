use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::data::{ClassifierInfo, GroupInfo};
use crate::handlers::{CreateBody, ReadmeBody};
use crate::middleware::{ApiResponse, ApiResult};
use crate::schema::{CLASSIFIER_INFO, GROUP_INFO};

/// POST /api/group/:group_id - Create a group with seeded info and README
///
/// Expected Input:
/// ```json
/// { "name": "Group name", "description": "Group description" }
/// ```
pub async fn group_create(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(body): Json<CreateBody>,
) -> ApiResult<Value> {
    state
        .groups
        .create(&group_id, &body.name, &body.description)
        .await?;
    Ok(ApiResponse::created(serde_json::json!({})))
}

/// PUT /api/group/:group_id/info - Validate and overwrite the group definition
///
/// Omitted list fields are stored as empty lists.
pub async fn info_put(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<GroupInfo> {
    let info: GroupInfo = GROUP_INFO.parse(&body)?;
    state.groups.set_info(&group_id, &info).await?;
    Ok(ApiResponse::success(info))
}

pub async fn readme_put(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(body): Json<ReadmeBody>,
) -> ApiResult<Value> {
    state.groups.set_readme(&group_id, &body.readme).await?;
    Ok(ApiResponse::empty())
}

/// POST /api/group/:group_id/classifier/:classifier_id - Create a classifier
/// inside an existing group
pub async fn classifier_create(
    State(state): State<AppState>,
    Path((group_id, classifier_id)): Path<(String, String)>,
    Json(body): Json<CreateBody>,
) -> ApiResult<Value> {
    state
        .classifiers
        .create(&group_id, &classifier_id, &body.name, &body.description)
        .await?;
    Ok(ApiResponse::created(serde_json::json!({})))
}

pub async fn classifier_info_put(
    State(state): State<AppState>,
    Path((group_id, classifier_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult<ClassifierInfo> {
    let info: ClassifierInfo = CLASSIFIER_INFO.parse(&body)?;
    state
        .classifiers
        .set_info(&group_id, &classifier_id, &info)
        .await?;
    Ok(ApiResponse::success(info))
}

pub async fn classifier_readme_put(
    State(state): State<AppState>,
    Path((group_id, classifier_id)): Path<(String, String)>,
    Json(body): Json<ReadmeBody>,
) -> ApiResult<Value> {
    state
        .classifiers
        .set_readme(&group_id, &classifier_id, &body.readme)
        .await?;
    Ok(ApiResponse::empty())
}
