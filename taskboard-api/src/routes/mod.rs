/// API route handlers, one module per resource
///
/// - `health`: Health check
/// - `auth`: Register, login, logout
/// - `profile`: Own profile and password
/// - `task_groups`: Task group CRUD
/// - `tasks`: Task CRUD, move, done flag

pub mod auth;
pub mod health;
pub mod profile;
pub mod task_groups;
pub mod tasks;
