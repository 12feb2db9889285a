/// Request middleware and per-request extractors
///
/// - `auth`: Bearer token validation, injects [`auth::AuthUser`]
/// - `cancel`: Per-request cancellation token

pub mod auth;
pub mod cancel;

pub use auth::{jwt_auth_layer, AuthUser};
pub use cancel::RequestScope;
