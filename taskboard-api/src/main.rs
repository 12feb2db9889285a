//! # Taskboard API Server
//!
//! Serves the task-tracking API. With `DATABASE_URL` set it runs against
//! PostgreSQL (migrations applied on startup); otherwise it keeps all data
//! in memory for the lifetime of the process.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskboard-api
//! ```

use anyhow::Context;
use taskboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskboard_shared::{
    db,
    service::{Repositories, Services},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // Human-readable logs in dev, JSON lines everywhere else
    let json_logs = !config.is_dev();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_api=debug,taskboard_shared=info,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!(
        app = %config.app.name,
        env = %config.app.env,
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let (repos, pool) = match &config.database {
        Some(database) => {
            if config.is_dev() {
                db::ensure_database_exists(&database.url)
                    .await
                    .context("Failed to ensure database exists")?;
            }
            let pool = db::create_pool(database.clone())
                .await
                .context("Failed to create database pool")?;
            db::run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
            (Repositories::postgres(pool.clone()), Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage; data is lost on exit");
            (Repositories::in_memory(), None)
        }
    };

    let services = Services::new(repos, config.hashing);
    let bind_address = config.bind_address();
    let state = AppState::new(services, config, pool.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(pool) = pool {
        db::close_pool(pool).await;
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
