/// Profile reads and edits, including password change

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{guarded, hash_blocking, verify_blocking};
use crate::auth::password::HashingParams;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{User, UserId};
use crate::repository::UserRepository;

/// Profile service
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    hashing: HashingParams,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, hashing: HashingParams) -> Self {
        Self { users, hashing }
    }

    pub async fn view(&self, cancel: &CancellationToken, user_id: UserId) -> ServiceResult<User> {
        guarded(cancel, self.users.get_by_id(user_id)).await
    }

    /// Overwrites avatar and status line
    ///
    /// An absent or empty avatar clears the stored one. The status text is
    /// taken as-is.
    pub async fn edit_avatar_and_status(
        &self,
        cancel: &CancellationToken,
        user_id: UserId,
        avatar_url: Option<&str>,
        status_text: &str,
    ) -> ServiceResult<()> {
        let avatar_url = avatar_url.filter(|url| !url.is_empty());

        guarded(cancel, self.users.update_profile(user_id, avatar_url, status_text)).await?;

        debug!(user_id, avatar = avatar_url.is_some(), "Profile updated");
        Ok(())
    }

    /// Replaces the password after re-verifying the current one
    ///
    /// The new password is not length-checked here; only registration
    /// enforces a minimum.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `old_password` does not match; the stored hash is
    ///   left untouched
    /// - `NotFound` if the user does not exist
    pub async fn change_password(
        &self,
        cancel: &CancellationToken,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        let user = guarded(cancel, self.users.get_by_id(user_id)).await?;

        if !verify_blocking(cancel, old_password, &user.password_hash).await? {
            warn!(user_id, "Password change rejected: wrong current password");
            return Err(ServiceError::unauthorized("Current password is incorrect"));
        }

        let password_hash = hash_blocking(cancel, new_password, self.hashing).await?;
        guarded(cancel, self.users.update_password(user_id, &password_hash)).await?;

        info!(user_id, "Password changed");
        Ok(())
    }
}
