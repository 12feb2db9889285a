/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "storage": "postgres",
///   "database": "connected",
///   "pool": { "active_connections": 1, "idle_connections": 4, "total_connections": 5 }
/// }
/// ```
///
/// Without a database the server reports `"storage": "memory"` and
/// `"database": "not_configured"`, omits `pool`, and is always healthy.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;
use taskboard_shared::db::{self, PoolStats};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    pub version: String,

    /// `postgres` or `memory`
    pub storage: String,

    /// `connected`, `disconnected` or `not_configured`
    pub database: String,

    /// Connection counts, only with a database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let (storage, database_status) = match &state.db {
        Some(pool) => match db::health_check(pool).await {
            Ok(()) => ("postgres", "connected"),
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                ("postgres", "disconnected")
            }
        },
        None => ("memory", "not_configured"),
    };

    Ok(Json(HealthResponse {
        status: if database_status == "disconnected" {
            "degraded".to_string()
        } else {
            "healthy".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: storage.to_string(),
        database: database_status.to_string(),
        pool: state.db.as_ref().map(db::get_pool_stats),
    }))
}
