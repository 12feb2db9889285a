/// Common test utilities for integration tests
///
/// Builds the full router over a fresh in-memory store, so no database is
/// needed, and wraps request plumbing in a couple of helpers.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::auth::password::HashingParams;
use taskboard_shared::service::{Repositories, Services};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context holding a router over its own store
pub struct TestContext {
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let mut config = Config::from_lookup(|key| match key {
            "APP_ENV" => Some("test".to_string()),
            "JWT_SECRET" => Some(TEST_JWT_SECRET.to_string()),
            _ => None,
        })
        .expect("test configuration is valid");
        config.hashing = HashingParams::fast_insecure();

        let services = Services::new(Repositories::in_memory(), config.hashing);
        let app = build_router(AppState::new(services, config.clone(), None));

        Self { app, config }
    }

    /// Sends one request; returns the status and the JSON body (Null when empty)
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.dispatch(request).await
    }

    /// Sends a prepared request, for headers `send` does not cover
    pub async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Registers `username` with a fixed password and returns an access token
    pub async fn signup(&self, username: &str) -> String {
        let credentials = serde_json::json!({ "username": username, "password": "secret1" });

        let (status, _) = self
            .send(Method::POST, "/api/v1/auth/register", None, Some(credentials.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .send(Method::POST, "/api/v1/auth/login", None, Some(credentials))
            .await;
        assert_eq!(status, StatusCode::OK);

        body["access_token"].as_str().unwrap().to_string()
    }
}
