/// User model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(64) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     avatar_url VARCHAR(512),
///     status_text TEXT NOT NULL DEFAULT '',
///     registered_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_active_at TIMESTAMPTZ,
///     is_online BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// User account
///
/// The password is only ever held as an Argon2id PHC string and is never
/// serialized into responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Storage-assigned ID, immutable after creation
    pub id: UserId,

    /// Unique, case-sensitive login name
    pub username: String,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Optional avatar/profile picture URL
    pub avatar_url: Option<String>,

    /// Free-text status line
    pub status_text: String,

    /// When the account was registered
    pub registered_at: DateTime<Utc>,

    /// Last login or other tracked activity (None if never active)
    pub last_active_at: Option<DateTime<Utc>>,

    /// Whether the user is currently logged in
    pub is_online: bool,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    pub avatar_url: Option<String>,
    pub status_text: String,
    pub registered_at: DateTime<Utc>,
    pub is_online: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            avatar_url: None,
            status_text: String::new(),
            registered_at: Utc::now(),
            last_active_at: None,
            is_online: false,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["is_online"], false);
    }
}
