/// Per-request cancellation
///
/// Every handler takes a [`RequestScope`]. Its token is cancelled when the
/// scope is dropped: either the handler finished, or the connection went
/// away and hyper dropped the handler future. Service calls still waiting
/// on storage or on the hashing pool observe the token and stop.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tokio_util::sync::{CancellationToken, DropGuard};

pub struct RequestScope {
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl RequestScope {
    pub fn new() -> Self {
        let cancel = CancellationToken::new();
        let guard = cancel.clone().drop_guard();
        Self {
            cancel,
            _guard: guard,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestScope
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new())
    }
}
