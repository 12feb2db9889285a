/// Ownership-scoped task group operations
///
/// Ownership is never checked here: the repository applies the caller's
/// user ID as part of each mutation and reports a mismatch as `NotFound`.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::guarded;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{GroupId, GroupStatus, NewTaskGroup, TaskGroup, UserId};
use crate::repository::TaskGroupRepository;

/// Task group service
#[derive(Clone)]
pub struct TaskGroupService {
    groups: Arc<dyn TaskGroupRepository>,
}

impl TaskGroupService {
    pub fn new(groups: Arc<dyn TaskGroupRepository>) -> Self {
        Self { groups }
    }

    /// Creates a group owned by `user_id`
    ///
    /// # Errors
    ///
    /// `Validation` for an empty title or a status outside
    /// `urgent`/`daily`/`longterm`
    pub async fn create(
        &self,
        cancel: &CancellationToken,
        user_id: UserId,
        title: &str,
        status: &str,
    ) -> ServiceResult<TaskGroup> {
        if title.is_empty() {
            return Err(ServiceError::validation("title required"));
        }
        let status = status
            .parse::<GroupStatus>()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let group = guarded(
            cancel,
            self.groups.create(NewTaskGroup {
                user_id,
                title: title.to_string(),
                status,
                created_at: chrono::Utc::now(),
            }),
        )
        .await?;

        debug!(user_id, group_id = group.id, status = %group.status, "Task group created");
        Ok(group)
    }

    pub async fn delete(&self, cancel: &CancellationToken, user_id: UserId, group_id: GroupId) -> ServiceResult<()> {
        guarded(cancel, self.groups.delete(group_id, user_id)).await?;

        debug!(user_id, group_id, "Task group deleted");
        Ok(())
    }

    pub async fn rename(
        &self,
        cancel: &CancellationToken,
        user_id: UserId,
        group_id: GroupId,
        new_title: &str,
    ) -> ServiceResult<()> {
        if new_title.is_empty() {
            return Err(ServiceError::validation("title required"));
        }

        guarded(cancel, self.groups.update_title(group_id, user_id, new_title)).await?;

        debug!(user_id, group_id, "Task group renamed");
        Ok(())
    }

    /// All groups owned by `user_id`, in storage order
    pub async fn list_by_user(&self, cancel: &CancellationToken, user_id: UserId) -> ServiceResult<Vec<TaskGroup>> {
        guarded(cancel, self.groups.list_by_user(user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::service::test_support::services;

    #[tokio::test]
    async fn test_create_validates_title_and_status() {
        let (services, _) = services();
        let cancel = CancellationToken::new();
        let uid = services.auth.register(&cancel, "alice", "secret1").await.unwrap().id;

        let err = services.task_groups.create(&cancel, uid, "", "urgent").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = services.task_groups.create(&cancel, uid, "Shopping", "bogus").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert!(services.task_groups.list_by_user(&cancel, uid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_owner() {
        let (services, _) = services();
        let cancel = CancellationToken::new();
        let uid = services.auth.register(&cancel, "alice", "secret1").await.unwrap().id;

        let group = services.task_groups.create(&cancel, uid, "Shopping", "urgent").await.unwrap();
        assert!(group.id > 0);
        assert_eq!(group.user_id, uid);
        assert_eq!(group.title, "Shopping");
        assert_eq!(group.status, GroupStatus::Urgent);

        for status in ["daily", "longterm"] {
            services.task_groups.create(&cancel, uid, "More", status).await.unwrap();
        }
        assert_eq!(services.task_groups.list_by_user(&cancel, uid).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_foreign_group_mutations_are_not_found() {
        let (services, _) = services();
        let cancel = CancellationToken::new();
        let alice = services.auth.register(&cancel, "alice", "secret1").await.unwrap().id;
        let mallory = services.auth.register(&cancel, "mallory", "secret1").await.unwrap().id;
        let group = services.task_groups.create(&cancel, alice, "Shopping", "urgent").await.unwrap();

        let err = services.task_groups.rename(&cancel, mallory, group.id, "Pwned").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = services.task_groups.delete(&cancel, mallory, group.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let groups = services.task_groups.list_by_user(&cancel, alice).await.unwrap();
        assert_eq!(groups, vec![group]);
        assert!(services.task_groups.list_by_user(&cancel, mallory).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_and_missing_groups_are_indistinguishable() {
        let (services, _) = services();
        let cancel = CancellationToken::new();
        let alice = services.auth.register(&cancel, "alice", "secret1").await.unwrap().id;
        let mallory = services.auth.register(&cancel, "mallory", "secret1").await.unwrap().id;
        let group = services.task_groups.create(&cancel, alice, "Shopping", "urgent").await.unwrap();

        let foreign = services.task_groups.delete(&cancel, mallory, group.id).await.unwrap_err();
        let missing = services.task_groups.delete(&cancel, mallory, 9999).await.unwrap_err();
        assert_eq!(foreign.to_string(), missing.to_string());
    }

    #[tokio::test]
    async fn test_rename_and_delete_own_group() {
        let (services, _) = services();
        let cancel = CancellationToken::new();
        let uid = services.auth.register(&cancel, "alice", "secret1").await.unwrap().id;
        let group = services.task_groups.create(&cancel, uid, "Shopping", "daily").await.unwrap();

        let err = services.task_groups.rename(&cancel, uid, group.id, "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        services.task_groups.rename(&cancel, uid, group.id, "Groceries").await.unwrap();
        let groups = services.task_groups.list_by_user(&cancel, uid).await.unwrap();
        assert_eq!(groups[0].title, "Groceries");

        services.task_groups.delete(&cancel, uid, group.id).await.unwrap();
        assert!(services.task_groups.list_by_user(&cancel, uid).await.unwrap().is_empty());

        let err = services.task_groups.delete(&cancel, uid, group.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
