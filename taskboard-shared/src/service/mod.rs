/// Business services
///
/// Four independent capability sets, each depending only on repository
/// contracts:
///
/// - [`AuthService`]: register, login, logout
/// - [`ProfileService`]: view and edit profile, change password
/// - [`TaskGroupService`]: ownership-scoped task group CRUD
/// - [`TaskService`]: ownership-scoped task CRUD, move, done flag
///
/// # Request scope
///
/// Services hold no per-call state and no locks, so one instance can serve
/// any number of concurrent requests. Every operation takes the caller's
/// `CancellationToken`. Each repository call is raced against it and a
/// fired token surfaces as `ServiceError::Cancelled` with the in-flight call
/// dropped.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::HashingParams;
/// use taskboard_shared::service::{Repositories, Services};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let services = Services::new(Repositories::in_memory(), HashingParams::fast_insecure());
/// let cancel = CancellationToken::new();
///
/// let alice = services.auth.register(&cancel, "alice", "secret1").await?;
/// let group = services.task_groups.create(&cancel, alice.id, "Shopping", "urgent").await?;
/// services.tasks.create(&cancel, alice.id, group.id, "Milk", "2 litres").await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::auth::password::{self, HashingParams};
use crate::error::{RepositoryResult, ServiceError, ServiceResult};
use crate::repository::{
    InMemoryStore, PgTaskGroupRepository, PgTaskRepository, PgUserRepository, TaskGroupRepository,
    TaskRepository, UserRepository,
};

pub mod auth;
pub mod profile;
pub mod task;
pub mod task_group;

pub use auth::AuthService;
pub use profile::ProfileService;
pub use task::TaskService;
pub use task_group::TaskGroupService;

/// Repository handles the services are built from
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub task_groups: Arc<dyn TaskGroupRepository>,
    pub tasks: Arc<dyn TaskRepository>,
}

impl Repositories {
    /// Postgres-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            task_groups: Arc::new(PgTaskGroupRepository::new(pool.clone())),
            tasks: Arc::new(PgTaskRepository::new(pool)),
        }
    }

    /// All three contracts served by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }

    /// All three contracts served by an existing in-memory store
    pub fn from_store(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            task_groups: store.clone(),
            tasks: store,
        }
    }
}

/// The four services, ready to hand to a transport layer
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub profile: ProfileService,
    pub task_groups: TaskGroupService,
    pub tasks: TaskService,
}

impl Services {
    pub fn new(repos: Repositories, hashing: HashingParams) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), hashing),
            profile: ProfileService::new(repos.users, hashing),
            task_groups: TaskGroupService::new(repos.task_groups),
            tasks: TaskService::new(repos.tasks),
        }
    }
}

/// Runs a repository call unless the caller cancels first
///
/// On cancellation the call's future is dropped, which aborts an in-flight
/// query.
pub(crate) async fn guarded<T, F>(cancel: &CancellationToken, op: F) -> ServiceResult<T>
where
    F: Future<Output = RepositoryResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ServiceError::Cancelled),
        result = op => result.map_err(ServiceError::from),
    }
}

/// Hashes on the blocking pool; the caller waits for the result
pub(crate) async fn hash_blocking(
    cancel: &CancellationToken,
    plaintext: &str,
    params: HashingParams,
) -> ServiceResult<String> {
    let plaintext = plaintext.to_owned();
    let job = tokio::task::spawn_blocking(move || password::hash_password(&plaintext, &params));
    await_blocking(cancel, job).await
}

/// Verifies on the blocking pool; the caller waits for the result
pub(crate) async fn verify_blocking(
    cancel: &CancellationToken,
    plaintext: &str,
    hash: &str,
) -> ServiceResult<bool> {
    let plaintext = plaintext.to_owned();
    let hash = hash.to_owned();
    let job = tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash));
    await_blocking(cancel, job).await
}

async fn await_blocking<T>(
    cancel: &CancellationToken,
    job: tokio::task::JoinHandle<Result<T, password::PasswordError>>,
) -> ServiceResult<T> {
    if cancel.is_cancelled() {
        job.abort();
        return Err(ServiceError::Cancelled);
    }

    let joined = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ServiceError::Cancelled),
        joined = job => joined,
    };

    let value = joined.map_err(|e| ServiceError::Infrastructure(format!("Hashing task failed: {}", e)))??;
    Ok(value)
}
