/// Configuration management for the API server
///
/// Configuration is read from environment variables (with `.env` support
/// through dotenvy).
///
/// # Environment Variables
///
/// - `APP_NAME`: Service name used in logs (default: taskboard)
/// - `APP_ENV`: `dev` or anything else; outside `dev` a real `JWT_SECRET`
///   is mandatory (default: dev)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `APP_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any
///   (default: `*` in dev, none otherwise)
/// - `DATABASE_URL`: PostgreSQL connection string; when unset the server
///   runs on the in-memory store
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: HS256 signing secret, at least 32 characters
/// - `JWT_TTL_MINUTES`: Access token lifetime (default: 120)
/// - `PASSWORD_HASH_MEMORY_KIB`, `PASSWORD_HASH_ITERATIONS`,
///   `PASSWORD_HASH_PARALLELISM`: Argon2id cost parameters
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use std::str::FromStr;

use taskboard_shared::auth::password::HashingParams;
use taskboard_shared::db::DatabaseConfig;

/// Token lifetime used when `JWT_TTL_MINUTES` is missing or unparsable
pub const DEFAULT_JWT_TTL_MINUTES: i64 = 120;

const MIN_JWT_SECRET_LEN: usize = 32;

const DEV_JWT_SECRET: &str = "taskboard-dev-secret-do-not-use-in-production";

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,

    /// None when no `DATABASE_URL` is configured
    pub database: Option<DatabaseConfig>,

    pub jwt: JwtConfig,

    /// Argon2id cost parameters
    pub hashing: HashingParams,
}

/// Server identity and listener
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,

    /// Deployment environment (`dev`, `staging`, `production`, ...)
    pub env: String,

    pub host: String,

    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Access token lifetime in minutes
    pub ttl_minutes: i64,
}

impl JwtConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.ttl_minutes)
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or the JWT
    /// secret is missing or too short outside `dev`.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = lookup("APP_ENV").unwrap_or_else(|| "dev".to_string());
        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None if env == "dev" => vec!["*".to_string()],
            None => Vec::new(),
        };

        let app = AppConfig {
            name: lookup("APP_NAME").unwrap_or_else(|| "taskboard".to_string()),
            env,
            host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "APP_PORT", 8080)?,
            cors_origins,
        };

        let database = match lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
                ..DatabaseConfig::default()
            }),
            None => None,
        };

        let secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if app.env == "dev" => DEV_JWT_SECRET.to_string(),
            None => anyhow::bail!("JWT_SECRET environment variable is required"),
        };
        if secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LEN);
        }

        let ttl_minutes = lookup("JWT_TTL_MINUTES")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_JWT_TTL_MINUTES);

        let defaults = HashingParams::default();
        let hashing = HashingParams {
            memory_kib: parse_or(&lookup, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            app,
            database,
            jwt: JwtConfig { secret, ttl_minutes },
            hashing,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }

    pub fn is_dev(&self) -> bool {
        self.app.env == "dev"
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}
