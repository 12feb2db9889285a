/// Task group endpoints
///
/// All routes are scoped to the authenticated user. A group owned by
/// someone else answers exactly like a missing one (`404`).

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::{AuthUser, RequestScope},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::models::{GroupId, TaskGroup};

/// Create request; `status` is one of `urgent`, `daily`, `longterm`
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub title: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameGroupRequest {
    pub title: String,
}

/// `GET /api/v1/groups`
pub async fn list_groups(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    scope: RequestScope,
) -> ApiResult<Json<Vec<TaskGroup>>> {
    let groups = state
        .services
        .task_groups
        .list_by_user(scope.token(), auth.user_id)
        .await?;

    Ok(Json(groups))
}

/// `POST /api/v1/groups`, answers `201 Created` with the group
pub async fn create_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    scope: RequestScope,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskGroup>)> {
    let Json(req) = payload?;

    let group = state
        .services
        .task_groups
        .create(scope.token(), auth.user_id, &req.title, &req.status)
        .await?;

    Ok((StatusCode::CREATED, Json(group)))
}

/// `PATCH /api/v1/groups/:id`
pub async fn rename_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<GroupId>, PathRejection>,
    scope: RequestScope,
    payload: Result<Json<RenameGroupRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(group_id) = path?;
    let Json(req) = payload?;

    state
        .services
        .task_groups
        .rename(scope.token(), auth.user_id, group_id, &req.title)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/v1/groups/:id`, removing the group's tasks with it
pub async fn delete_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<GroupId>, PathRejection>,
    scope: RequestScope,
) -> ApiResult<StatusCode> {
    let Path(group_id) = path?;

    state
        .services
        .task_groups
        .delete(scope.token(), auth.user_id, group_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
