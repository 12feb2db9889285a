/// Database layer
///
/// # Modules
///
/// - `pool`: Postgres connection pool with health checks
/// - `migrations`: Schema migrations from the workspace `migrations/` directory
///
/// Repositories built on the pool live in `crate::repository::postgres`.

pub mod migrations;
pub mod pool;

pub use migrations::{ensure_database_exists, run_migrations};
pub use pool::{close_pool, create_pool, get_pool_stats, health_check, DatabaseConfig, PoolStats};
