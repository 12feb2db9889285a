/// JWT authentication middleware
///
/// Validates the `Authorization: Bearer <token>` header and injects
/// [`AuthUser`] into request extensions. Handlers read it with
/// `Extension<AuthUser>`.
///
/// Every rejection answers `401 unauthorized`. That includes a header with
/// a scheme other than `Bearer`, which is not treated as a `400`.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use taskboard_shared::auth::jwt;
use taskboard_shared::models::UserId;

use crate::{app::AppState, error::ApiError};

/// Identity of the caller, taken from a validated token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
}

/// Rejects the request unless it carries a valid access token
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthUser { user_id: claims.sub });

    Ok(next.run(req).await)
}
