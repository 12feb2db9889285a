/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use taskboard_api::{app::AppState, config::Config};
/// use taskboard_shared::service::{Repositories, Services};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let services = Services::new(Repositories::in_memory(), config.hashing);
/// let state = AppState::new(services, config, None);
/// let app = taskboard_api::app::build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::jwt_auth_layer, routes};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::any::Any;
use std::sync::Arc;
use taskboard_shared::service::Services;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,

    /// Postgres pool, only when the server runs against a database
    pub db: Option<PgPool>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(services: Services, config: Config, db: Option<PgPool>) -> Self {
        Self {
            services,
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health
/// └── /api/v1/
///     ├── POST   /auth/register
///     ├── POST   /auth/login
///     ├── POST   /auth/logout          (auth)
///     ├── GET    /profile              (auth)
///     ├── PUT    /profile              (auth)
///     ├── PUT    /profile/password     (auth)
///     ├── GET    /groups               (auth)
///     ├── POST   /groups               (auth)
///     ├── PATCH  /groups/:id           (auth)
///     ├── DELETE /groups/:id           (auth)
///     ├── GET    /groups/:id/tasks     (auth)
///     ├── POST   /groups/:id/tasks     (auth)
///     ├── PATCH  /tasks/:id            (auth)
///     ├── DELETE /tasks/:id            (auth)
///     ├── PUT    /tasks/:id/group      (auth)
///     └── PUT    /tasks/:id/done       (auth)
/// ```
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let public_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login));

    // route_layer so unknown paths still answer 404, not 401
    let protected_routes = Router::new()
        .route("/auth/logout", post(routes::auth::logout))
        .route(
            "/profile",
            get(routes::profile::view_profile).put(routes::profile::edit_profile),
        )
        .route("/profile/password", put(routes::profile::change_password))
        .route(
            "/groups",
            get(routes::task_groups::list_groups).post(routes::task_groups::create_group),
        )
        .route(
            "/groups/:id",
            patch(routes::task_groups::rename_group).delete(routes::task_groups::delete_group),
        )
        .route(
            "/groups/:id/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            patch(routes::tasks::edit_task).delete(routes::tasks::delete_task),
        )
        .route("/tasks/:id/group", put(routes::tasks::move_task))
        .route("/tasks/:id/done", put(routes::tasks::set_task_done))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = public_routes.merge(protected_routes);

    let router = Router::new()
        .merge(health_routes)
        .nest("/api/v1", v1_routes);

    with_http_layers(router, &state.config).with_state(state)
}

/// Wraps a router in the outer HTTP stack
///
/// From the outside in: CORS, `x-request-id` assignment, tracing (the span
/// carries the id), id propagation onto the response, panic recovery.
pub fn with_http_layers<S>(router: Router<S>, config: &Config) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(config))
}

/// Turns a handler panic into the usual `500` error body
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = err.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = err.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::InternalError(format!("handler panicked: {}", detail)).into_response()
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.app.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .app
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config::from_lookup(|key| match key {
            "APP_ENV" => Some("test".to_string()),
            "JWT_SECRET" => Some("app-layer-test-secret-0123456789abcdef".to_string()),
            _ => None,
        })
        .unwrap()
    }

    async fn explode() -> &'static str {
        panic!("boom");
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_json_500() {
        let router: Router = with_http_layers(Router::new().route("/explode", get(explode)), &test_config());

        let response = router
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key("x-request-id"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_echoed() {
        let router: Router = with_http_layers(Router::new().route("/ok", get(|| async { "ok" })), &test_config());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/ok")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
