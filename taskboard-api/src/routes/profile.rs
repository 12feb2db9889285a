/// Profile endpoints for the authenticated user
///
/// - `GET /api/v1/profile` - Own profile
/// - `PUT /api/v1/profile` - Replace avatar and status line
/// - `PUT /api/v1/profile/password` - Change password

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::{AuthUser, RequestScope},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::models::User;

/// Profile edit request
///
/// Both fields are overwritten. A missing or empty `avatar_url` clears the
/// avatar.
#[derive(Debug, Deserialize)]
pub struct EditProfileRequest {
    #[serde(default)]
    pub avatar_url: Option<String>,

    #[serde(default)]
    pub status_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

pub async fn view_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    scope: RequestScope,
) -> ApiResult<Json<User>> {
    let user = state.services.profile.view(scope.token(), auth.user_id).await?;
    Ok(Json(user))
}

pub async fn edit_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    scope: RequestScope,
    payload: Result<Json<EditProfileRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;

    state
        .services
        .profile
        .edit_avatar_and_status(scope.token(), auth.user_id, req.avatar_url.as_deref(), &req.status_text)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change password
///
/// `401` when `old_password` does not match the stored one.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    scope: RequestScope,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;

    state
        .services
        .profile
        .change_password(scope.token(), auth.user_id, &req.old_password, &req.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
