/// Error types for the service and persistence layers
///
/// Services return [`ServiceError`], a tagged enumeration callers branch on
/// through [`ServiceError::kind`]. Repositories return [`RepositoryError`],
/// which services forward unchanged in meaning.
///
/// # Taxonomy
///
/// | Kind             | Produced by                                         |
/// |------------------|-----------------------------------------------------|
/// | `Validation`     | Service, before any repository call                 |
/// | `Unauthorized`   | Service, on a failed credential check               |
/// | `Conflict`       | Repository, on a uniqueness violation               |
/// | `NotFound`       | Repository, on absence or an ownership mismatch     |
/// | `Cancelled`      | Service, when the caller's token fires mid-call     |
/// | `Infrastructure` | Repository or hashing failures, propagated as-is    |
///
/// An ownership mismatch is reported as `NotFound`, so another user's
/// resource and a missing one look the same to the caller.

use serde::Serialize;
use std::fmt;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Repository result type alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Discriminant of a [`ServiceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    Conflict,
    NotFound,
    Cancelled,
    Infrastructure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Infrastructure => "infrastructure",
        };
        f.write_str(name)
    }
}

/// Error returned by every service operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed input; never wraps a storage error
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Credential mismatch
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Uniqueness violation reported by storage
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Entity absent, or not owned by the caller
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller cancelled the request or its deadline passed
    #[error("Operation cancelled")]
    Cancelled,

    /// Any other storage or runtime failure
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl ServiceError {
    /// Returns the error kind callers should branch on
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::Unauthorized(_) => ErrorKind::Unauthorized,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Cancelled => ErrorKind::Cancelled,
            ServiceError::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }

    pub(crate) fn unauthorized(msg: impl Into<String>) -> Self {
        ServiceError::Unauthorized(msg.into())
    }
}

/// Error returned by repository implementations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No row matched (absent, or owned by someone else)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness constraint violated
    #[error("{0}")]
    Conflict(String),

    /// Any other storage failure
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Postgres SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Resource"),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    let constraint = db_err.constraint().unwrap_or("unique constraint");
                    if constraint.contains("username") {
                        RepositoryError::Conflict("Username already taken".to_string())
                    } else {
                        RepositoryError::Conflict(format!("Constraint violation: {}", constraint))
                    }
                }
                // A referenced row (e.g. the caller's own group) does not exist
                Some(FOREIGN_KEY_VIOLATION) => RepositoryError::NotFound("Referenced resource"),
                _ => RepositoryError::Storage(format!("Database error: {}", db_err)),
            },
            other => RepositoryError::Storage(format!("Database error: {}", other)),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(entity) => ServiceError::NotFound(format!("{} not found", entity)),
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            RepositoryError::Storage(msg) => ServiceError::Infrastructure(msg),
        }
    }
}

impl From<crate::auth::password::PasswordError> for ServiceError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        ServiceError::Infrastructure(format!("Password operation failed: {}", err))
    }
}
