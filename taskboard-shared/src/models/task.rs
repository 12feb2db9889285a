/// Task model
///
/// # State Machine
///
/// ```text
/// not-done <-> done
/// ```
///
/// Both states are valid at any time. Transitions are explicit sets, never
/// flips, so repeating a set is a no-op.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     group_id BIGINT NOT NULL,
///     title VARCHAR(255) NOT NULL,
///     body TEXT NOT NULL,
///     is_done BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     FOREIGN KEY (group_id, user_id) REFERENCES task_groups(id, user_id) ON DELETE CASCADE
/// );
/// ```
///
/// The composite foreign key keeps a task inside a group of the same owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GroupId, TaskId, UserId};

/// Task owned by one user and filed in one of that user's groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: TaskId,

    /// Owner, immutable after creation
    pub user_id: UserId,

    /// Current group; changes only through a move
    pub group_id: GroupId,

    pub title: String,
    pub body: String,
    pub is_done: bool,

    /// Set by storage on insert
    pub created_at: DateTime<Utc>,

    /// Set by storage on every effective change
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// Timestamps and the done flag are left to storage.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: UserId,
    pub group_id: GroupId,
    pub title: String,
    pub body: String,
}
