/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/v1/auth/register` - Register new user
/// - `POST /api/v1/auth/login` - Login and get an access token
/// - `POST /api/v1/auth/logout` - Mark the caller offline

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::{AuthUser, RequestScope},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{auth::jwt, models::User};

/// Register and login request
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The user as stored after login (online, fresh last-active)
    pub user: User,

    pub access_token: String,

    /// Always `Bearer`
    pub token_type: String,

    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Register endpoint
///
/// ```text
/// POST /api/v1/auth/register
/// Content-Type: application/json
///
/// { "username": "alice", "password": "secret1" }
/// ```
///
/// Responds `201 Created` with the new user. `422` when the username is
/// shorter than 3 or the password shorter than 6 characters, `409` when the
/// username is taken.
pub async fn register(
    State(state): State<AppState>,
    scope: RequestScope,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(req) = payload?;

    let user = state
        .services
        .auth
        .register(scope.token(), &req.username, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login endpoint
///
/// ```text
/// POST /api/v1/auth/login
/// Content-Type: application/json
///
/// { "username": "alice", "password": "secret1" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "user": { "id": 1, "username": "alice", "is_online": true, ... },
///   "access_token": "eyJ...",
///   "token_type": "Bearer",
///   "expires_in": 7200
/// }
/// ```
///
/// Unknown usernames and wrong passwords both answer `401` with the same
/// body.
pub async fn login(
    State(state): State<AppState>,
    scope: RequestScope,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = payload?;

    let user = state
        .services
        .auth
        .login(scope.token(), &req.username, &req.password)
        .await?;

    let ttl = state.config.jwt.ttl();
    let claims = jwt::Claims::new(user.id, ttl);
    let access_token = jwt::create_token(&claims, state.jwt_secret()).map_err(ApiError::from)?;

    Ok(Json(LoginResponse {
        user,
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: ttl.num_seconds(),
    }))
}

/// Logout endpoint
///
/// Idempotent; answers `204 No Content`. The access token itself stays
/// valid until it expires.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    scope: RequestScope,
) -> ApiResult<StatusCode> {
    state.services.auth.logout(scope.token(), auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
