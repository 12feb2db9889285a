/// Registration, login and logout
///
/// Owns the password-hash lifecycle and the online / last-active
/// transitions of a user.
///
/// # Credential failures
///
/// An unknown username and a wrong password both fail with the same
/// `Unauthorized` error. The unknown-username path still runs one hash
/// verification against a decoy hash, so the two cases cost about the same
/// and cannot be told apart by response shape or timing.

use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{guarded, hash_blocking, verify_blocking};
use crate::auth::password::HashingParams;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewUser, User, UserId};
use crate::repository::UserRepository;

/// Minimum username length in bytes
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum password length in bytes
pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hashing: HashingParams,
    decoy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hashing: HashingParams) -> Self {
        Self {
            users,
            hashing,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Registers a new, offline user
    ///
    /// # Errors
    ///
    /// - `Validation` if the username is shorter than 3 bytes or the password
    ///   shorter than 6 (checked before touching storage)
    /// - `Conflict` if the username is taken
    pub async fn register(
        &self,
        cancel: &CancellationToken,
        username: &str,
        password: &str,
    ) -> ServiceResult<User> {
        if username.len() < MIN_USERNAME_LEN {
            return Err(ServiceError::validation(format!(
                "username must be at least {} characters",
                MIN_USERNAME_LEN
            )));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ServiceError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let password_hash = hash_blocking(cancel, password, self.hashing).await?;

        let user = guarded(
            cancel,
            self.users.create(NewUser {
                username: username.to_string(),
                password_hash,
                avatar_url: None,
                status_text: String::new(),
                registered_at: chrono::Utc::now(),
                is_online: false,
            }),
        )
        .await?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Verifies credentials and marks the user online
    ///
    /// Returns the user as stored after the online flag and last-active
    /// timestamp were updated. Cancellation is observed up to the password
    /// check; once the user is being marked online, the login runs to
    /// completion.
    pub async fn login(
        &self,
        cancel: &CancellationToken,
        username: &str,
        password: &str,
    ) -> ServiceResult<User> {
        let user = match guarded(cancel, self.users.get_by_username(username)).await {
            Ok(user) => user,
            Err(ServiceError::NotFound(_)) => {
                let decoy = self.decoy_hash(cancel).await?;
                verify_blocking(cancel, password, decoy).await?;
                warn!("Login rejected: unknown username");
                return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
            }
            Err(e) => return Err(e),
        };

        if !verify_blocking(cancel, password, &user.password_hash).await? {
            warn!(user_id = user.id, "Login rejected: wrong password");
            return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
        }

        // Last point a cancellation is honoured; the online flag and the
        // last-active stamp are written together or not at all.
        if cancel.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }
        self.users.set_online(user.id, true).await?;
        self.users.update_last_active(user.id).await?;
        let user = self.users.get_by_id(user.id).await?;

        info!(user_id = user.id, "User logged in");
        Ok(user)
    }

    /// Marks the user offline. Repeating it is not an error.
    pub async fn logout(&self, cancel: &CancellationToken, user_id: UserId) -> ServiceResult<()> {
        guarded(cancel, self.users.set_online(user_id, false)).await?;

        info!(user_id, "User logged out");
        Ok(())
    }

    async fn decoy_hash(&self, cancel: &CancellationToken) -> ServiceResult<&str> {
        let hash = self
            .decoy_hash
            .get_or_try_init(|| async {
                debug!("Computing decoy password hash");
                hash_blocking(cancel, "taskboard-decoy-password", self.hashing).await
            })
            .await?;
        Ok(hash.as_str())
    }
}
