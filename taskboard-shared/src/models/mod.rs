/// Domain entities for Taskboard
///
/// Plain data shared by the repositories and services. None of these types
/// carry behavior beyond parsing and formatting.
///
/// # Models
///
/// - `user`: User accounts, credentials and presence
/// - `task_group`: Named, status-tagged buckets of tasks owned by one user
/// - `task`: Units of work living in exactly one group at a time

pub mod task;
pub mod task_group;
pub mod user;

pub use task::{NewTask, Task};
pub use task_group::{GroupStatus, NewTaskGroup, TaskGroup};
pub use user::{NewUser, User};

/// Storage-assigned identifier of a user
pub type UserId = i64;

/// Storage-assigned identifier of a task group
pub type GroupId = i64;

/// Storage-assigned identifier of a task
pub type TaskId = i64;
