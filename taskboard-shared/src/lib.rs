//! # Taskboard Shared Library
//!
//! Business core of the Taskboard backend: entities, the error taxonomy,
//! credential handling, repository contracts with their Postgres and
//! in-memory backings, and the four services the HTTP layer calls into.
//!
//! ## Module Organization
//!
//! - `models`: Users, task groups and tasks
//! - `error`: Service and repository error types
//! - `auth`: Password hashing and access tokens
//! - `repository`: Persistence contracts and implementations
//! - `service`: Auth, profile, task group and task services
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
