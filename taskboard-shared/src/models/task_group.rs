/// Task group model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_groups (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     status VARCHAR(16) NOT NULL CHECK (status IN ('urgent', 'daily', 'longterm')),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{GroupId, UserId};

/// Group status
///
/// Closed set: anything other than these three values is rejected at parse
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Urgent,
    Daily,
    LongTerm,
}

impl GroupStatus {
    /// All permitted statuses
    pub const ALL: [GroupStatus; 3] = [GroupStatus::Urgent, GroupStatus::Daily, GroupStatus::LongTerm];

    /// Wire and storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Urgent => "urgent",
            GroupStatus::Daily => "daily",
            GroupStatus::LongTerm => "longterm",
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown group status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid group status: {0:?} (expected one of urgent, daily, longterm)")]
pub struct InvalidGroupStatus(pub String);

impl TryFrom<String> for GroupStatus {
    type Error = InvalidGroupStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for GroupStatus {
    type Err = InvalidGroupStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "urgent" => Ok(GroupStatus::Urgent),
            "daily" => Ok(GroupStatus::Daily),
            "longterm" => Ok(GroupStatus::LongTerm),
            other => Err(InvalidGroupStatus(other.to_string())),
        }
    }
}

/// Task group owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskGroup {
    pub id: GroupId,

    /// Owner, set at creation and never reassigned
    pub user_id: UserId,

    /// Non-empty title
    pub title: String,

    /// Stored as text, parsed on the way out
    #[sqlx(try_from = "String")]
    pub status: GroupStatus,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task group
#[derive(Debug, Clone)]
pub struct NewTaskGroup {
    pub user_id: UserId,
    pub title: String,
    pub status: GroupStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_accepts_known_values() {
        for status in GroupStatus::ALL {
            assert_eq!(status.as_str().parse::<GroupStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_rejects_unknown_values() {
        for raw in ["bogus", "", "Urgent", "long_term", "DAILY"] {
            assert!(raw.parse::<GroupStatus>().is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_status_serde_wire_form() {
        assert_eq!(serde_json::to_string(&GroupStatus::LongTerm).unwrap(), "\"longterm\"");
        let parsed: GroupStatus = serde_json::from_str("\"daily\"").unwrap();
        assert_eq!(parsed, GroupStatus::Daily);
    }
}
