/// Task endpoints
///
/// Tasks are created and listed through their group
/// (`/api/v1/groups/:id/tasks`) and edited through `/api/v1/tasks/:id`.
/// Foreign tasks and groups answer `404`.

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
use taskboard_shared::models::{GroupId, Task, TaskId};

/// Create and edit request; both fields must be non-empty
#[derive(Debug, Deserialize)]
pub struct TaskContentRequest {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    pub group_id: GroupId,
}

#[derive(Debug, Deserialize)]
pub struct SetDoneRequest {
    pub done: bool,
}

/// `GET /api/v1/groups/:id/tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<GroupId>, PathRejection>,
    scope: RequestScope,
) -> ApiResult<Json<Vec<Task>>> {
    let Path(group_id) = path?;

    let tasks = state
        .services
        .tasks
        .list_by_group(scope.token(), auth.user_id, group_id)
        .await?;

    Ok(Json(tasks))
}

/// `POST /api/v1/groups/:id/tasks`, answers `201 Created` with the task
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<GroupId>, PathRejection>,
    scope: RequestScope,
    payload: Result<Json<TaskContentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Path(group_id) = path?;
    let Json(req) = payload?;

    let task = state
        .services
        .tasks
        .create(scope.token(), auth.user_id, group_id, &req.title, &req.body)
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// `PATCH /api/v1/tasks/:id`
pub async fn edit_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<TaskId>, PathRejection>,
    scope: RequestScope,
    payload: Result<Json<TaskContentRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(task_id) = path?;
    let Json(req) = payload?;

    state
        .services
        .tasks
        .edit(scope.token(), auth.user_id, task_id, &req.title, &req.body)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/v1/tasks/:id`
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<TaskId>, PathRejection>,
    scope: RequestScope,
) -> ApiResult<StatusCode> {
    let Path(task_id) = path?;

    state.services.tasks.delete(scope.token(), auth.user_id, task_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/v1/tasks/:id/group`
pub async fn move_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<TaskId>, PathRejection>,
    scope: RequestScope,
    payload: Result<Json<MoveTaskRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(task_id) = path?;
    let Json(req) = payload?;

    state
        .services
        .tasks
        .move_to_group(scope.token(), auth.user_id, task_id, req.group_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/v1/tasks/:id/done`, setting the flag to the given value
pub async fn set_task_done(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    path: Result<Path<TaskId>, PathRejection>,
    scope: RequestScope,
    payload: Result<Json<SetDoneRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(task_id) = path?;
    let Json(req) = payload?;

    state
        .services
        .tasks
        .toggle_done(scope.token(), auth.user_id, task_id, req.done)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
