/// Schema migrations
///
/// The SQL files under the workspace `migrations/` directory are embedded at
/// compile time, so the binary carries its own schema.

use sqlx::migrate::{MigrateDatabase, MigrateError, Migrator};
use sqlx::{PgPool, Postgres};
use tracing::{error, info};

static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Applies every migration not yet recorded in `_sqlx_migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    info!(embedded = MIGRATOR.iter().count(), "Running database migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        error!(error = %e, "Database migration failed");
        e
    })?;

    info!("Database schema up to date");
    Ok(())
}

/// Creates the database named in `database_url` when it is missing
///
/// Meant for local development; production databases are provisioned
/// separately.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        return Ok(());
    }

    info!("Creating missing database");
    Postgres::create_database(database_url).await
}
