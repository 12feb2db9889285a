/// Persistence contracts consumed by the services
///
/// Each trait is the full set of storage operations one service family may
/// use. There are two backings:
///
/// - [`postgres`]: sqlx over a `PgPool`, used in production
/// - [`memory`]: a lock-protected in-process store with the same semantics,
///   used by tests and by the API when no database is configured
///
/// # Ownership filter
///
/// Every mutation of a group or task takes both the target ID and the
/// caller's user ID. The implementation must apply it as one atomic,
/// owner-filtered statement and report `RepositoryError::NotFound` when
/// nothing matched. Mismatched owners are indistinguishable from missing
/// rows.

use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::models::{GroupId, NewTask, NewTaskGroup, NewUser, Task, TaskGroup, TaskId, User, UserId};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{PgTaskGroupRepository, PgTaskRepository, PgUserRepository};

/// User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. Fails with `Conflict` on a duplicate username.
    async fn create(&self, user: NewUser) -> RepositoryResult<User>;

    async fn get_by_id(&self, id: UserId) -> RepositoryResult<User>;

    async fn get_by_username(&self, username: &str) -> RepositoryResult<User>;

    /// Overwrites avatar and status; `None` clears the avatar
    async fn update_profile(
        &self,
        id: UserId,
        avatar_url: Option<&str>,
        status_text: &str,
    ) -> RepositoryResult<()>;

    async fn update_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<()>;

    async fn set_online(&self, id: UserId, online: bool) -> RepositoryResult<()>;

    /// Stamps `last_active_at` with the storage clock
    async fn update_last_active(&self, id: UserId) -> RepositoryResult<()>;
}

/// Task group persistence
#[async_trait]
pub trait TaskGroupRepository: Send + Sync {
    async fn create(&self, group: NewTaskGroup) -> RepositoryResult<TaskGroup>;

    async fn delete(&self, id: GroupId, owner: UserId) -> RepositoryResult<()>;

    async fn update_title(&self, id: GroupId, owner: UserId, title: &str) -> RepositoryResult<()>;

    async fn list_by_user(&self, owner: UserId) -> RepositoryResult<Vec<TaskGroup>>;
}

/// Task persistence
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a task. Fails with `NotFound` when `group_id` is not one of
    /// the owner's groups.
    async fn create(&self, task: NewTask) -> RepositoryResult<Task>;

    async fn delete(&self, id: TaskId, owner: UserId) -> RepositoryResult<()>;

    async fn update(&self, id: TaskId, owner: UserId, title: &str, body: &str) -> RepositoryResult<()>;

    /// Same group-ownership rule as `create`
    async fn move_to_group(&self, id: TaskId, owner: UserId, group_id: GroupId) -> RepositoryResult<()>;

    /// Sets the done flag. `updated_at` only moves when the value changes.
    async fn set_done(&self, id: TaskId, owner: UserId, done: bool) -> RepositoryResult<()>;

    async fn list_by_group(&self, owner: UserId, group_id: GroupId) -> RepositoryResult<Vec<Task>>;
}
