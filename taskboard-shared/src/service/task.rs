/// Ownership-scoped task operations
///
/// As with groups, the caller's user ID travels with every repository call
/// and the repository enforces the match. Group membership on create and
/// move is enforced by storage: a task can only reference a group with the
/// same owner, otherwise the call fails with `NotFound`.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::guarded;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{GroupId, NewTask, Task, TaskId, UserId};
use crate::repository::TaskRepository;

fn validate_content(title: &str, body: &str) -> ServiceResult<()> {
    if title.is_empty() {
        return Err(ServiceError::validation("title required"));
    }
    if body.is_empty() {
        return Err(ServiceError::validation("body required"));
    }
    Ok(())
}

/// Task service
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    /// Creates a not-done task in `group_id`
    ///
    /// Timestamps are assigned by storage.
    pub async fn create(
        &self,
        cancel: &CancellationToken,
        user_id: UserId,
        group_id: GroupId,
        title: &str,
        body: &str,
    ) -> ServiceResult<Task> {
        validate_content(title, body)?;

        let task = guarded(
            cancel,
            self.tasks.create(NewTask {
                user_id,
                group_id,
                title: title.to_string(),
                body: body.to_string(),
            }),
        )
        .await?;

        debug!(user_id, group_id, task_id = task.id, "Task created");
        Ok(task)
    }

    pub async fn edit(
        &self,
        cancel: &CancellationToken,
        user_id: UserId,
        task_id: TaskId,
        title: &str,
        body: &str,
    ) -> ServiceResult<()> {
        validate_content(title, body)?;

        guarded(cancel, self.tasks.update(task_id, user_id, title, body)).await?;

        debug!(user_id, task_id, "Task edited");
        Ok(())
    }

    pub async fn delete(&self, cancel: &CancellationToken, user_id: UserId, task_id: TaskId) -> ServiceResult<()> {
        guarded(cancel, self.tasks.delete(task_id, user_id)).await?;

        debug!(user_id, task_id, "Task deleted");
        Ok(())
    }

    /// Moves a task to another of the caller's groups
    pub async fn move_to_group(
        &self,
        cancel: &CancellationToken,
        user_id: UserId,
        task_id: TaskId,
        new_group_id: GroupId,
    ) -> ServiceResult<()> {
        guarded(cancel, self.tasks.move_to_group(task_id, user_id, new_group_id)).await?;

        debug!(user_id, task_id, group_id = new_group_id, "Task moved");
        Ok(())
    }

    /// Sets (not flips) the done flag
    pub async fn toggle_done(
        &self,
        cancel: &CancellationToken,
        user_id: UserId,
        task_id: TaskId,
        done: bool,
    ) -> ServiceResult<()> {
        guarded(cancel, self.tasks.set_done(task_id, user_id, done)).await?;

        debug!(user_id, task_id, done, "Task done flag set");
        Ok(())
    }

    /// Tasks in `group_id` owned by `user_id`, in storage order
    pub async fn list_by_group(
        &self,
        cancel: &CancellationToken,
        user_id: UserId,
        group_id: GroupId,
    ) -> ServiceResult<Vec<Task>> {
        guarded(cancel, self.tasks.list_by_group(user_id, group_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::TaskGroup;
    use crate::service::{test_support::services, Services};

    struct Fixture {
        services: Services,
        cancel: CancellationToken,
        alice: UserId,
        mallory: UserId,
        inbox: TaskGroup,
    }

    async fn fixture() -> Fixture {
        let (services, _) = services();
        let cancel = CancellationToken::new();
        let alice = services.auth.register(&cancel, "alice", "secret1").await.unwrap().id;
        let mallory = services.auth.register(&cancel, "mallory", "secret1").await.unwrap().id;
        let inbox = services.task_groups.create(&cancel, alice, "Inbox", "daily").await.unwrap();

        Fixture {
            services,
            cancel,
            alice,
            mallory,
            inbox,
        }
    }

    impl Fixture {
        async fn only_task(&self, group_id: GroupId) -> Task {
            let mut tasks = self
                .services
                .tasks
                .list_by_group(&self.cancel, self.alice, group_id)
                .await
                .unwrap();
            assert_eq!(tasks.len(), 1);
            tasks.remove(0)
        }
    }

    #[tokio::test]
    async fn test_create_validates_content() {
        let f = fixture().await;
        let tasks = &f.services.tasks;

        for (title, body) in [("", "body"), ("title", ""), ("", "")] {
            let err = tasks.create(&f.cancel, f.alice, f.inbox.id, title, body).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(tasks.list_by_group(&f.cancel, f.alice, f.inbox.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_defaults_to_not_done() {
        let f = fixture().await;

        let task = f
            .services
            .tasks
            .create(&f.cancel, f.alice, f.inbox.id, "Milk", "2 litres")
            .await
            .unwrap();

        assert!(task.id > 0);
        assert_eq!(task.user_id, f.alice);
        assert_eq!(task.group_id, f.inbox.id);
        assert!(!task.is_done);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[tokio::test]
    async fn test_create_in_foreign_group_not_found() {
        let f = fixture().await;

        let err = f
            .services
            .tasks
            .create(&f.cancel, f.mallory, f.inbox.id, "Sneaky", "task")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(f
            .services
            .tasks
            .list_by_group(&f.cancel, f.alice, f.inbox.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_edit_updates_content() {
        let f = fixture().await;
        let tasks = &f.services.tasks;
        let task = tasks.create(&f.cancel, f.alice, f.inbox.id, "Milk", "2 litres").await.unwrap();

        let err = tasks.edit(&f.cancel, f.alice, task.id, "Milk", "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        tasks.edit(&f.cancel, f.alice, task.id, "Oat milk", "1 litre").await.unwrap();
        let stored = f.only_task(f.inbox.id).await;
        assert_eq!(stored.title, "Oat milk");
        assert_eq!(stored.body, "1 litre");
        assert!(stored.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn test_foreign_task_mutations_are_not_found() {
        let f = fixture().await;
        let tasks = &f.services.tasks;
        let task = tasks.create(&f.cancel, f.alice, f.inbox.id, "Milk", "2 litres").await.unwrap();
        let mallory_group = f
            .services
            .task_groups
            .create(&f.cancel, f.mallory, "Mine", "urgent")
            .await
            .unwrap();

        let results = [
            tasks.edit(&f.cancel, f.mallory, task.id, "x", "y").await,
            tasks.toggle_done(&f.cancel, f.mallory, task.id, true).await,
            tasks.move_to_group(&f.cancel, f.mallory, task.id, mallory_group.id).await,
            tasks.delete(&f.cancel, f.mallory, task.id).await,
        ];
        for result in results {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
        }

        assert_eq!(f.only_task(f.inbox.id).await, task);
        assert!(tasks
            .list_by_group(&f.cancel, f.mallory, f.inbox.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_move_between_own_groups() {
        let f = fixture().await;
        let tasks = &f.services.tasks;
        let task = tasks.create(&f.cancel, f.alice, f.inbox.id, "Milk", "2 litres").await.unwrap();
        let later = f
            .services
            .task_groups
            .create(&f.cancel, f.alice, "Later", "longterm")
            .await
            .unwrap();

        tasks.move_to_group(&f.cancel, f.alice, task.id, later.id).await.unwrap();

        assert!(tasks.list_by_group(&f.cancel, f.alice, f.inbox.id).await.unwrap().is_empty());
        let moved = f.only_task(later.id).await;
        assert_eq!(moved.id, task.id);
        assert_eq!(moved.user_id, f.alice);
    }

    #[tokio::test]
    async fn test_move_into_foreign_group_not_found() {
        let f = fixture().await;
        let tasks = &f.services.tasks;
        let task = tasks.create(&f.cancel, f.alice, f.inbox.id, "Milk", "2 litres").await.unwrap();
        let foreign = f
            .services
            .task_groups
            .create(&f.cancel, f.mallory, "Mine", "urgent")
            .await
            .unwrap();

        let err = tasks.move_to_group(&f.cancel, f.alice, task.id, foreign.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(f.only_task(f.inbox.id).await.group_id, f.inbox.id);
    }

    #[tokio::test]
    async fn test_toggle_done_round_trip() {
        let f = fixture().await;
        let tasks = &f.services.tasks;
        let task = tasks.create(&f.cancel, f.alice, f.inbox.id, "Milk", "2 litres").await.unwrap();

        tasks.toggle_done(&f.cancel, f.alice, task.id, true).await.unwrap();
        assert!(f.only_task(f.inbox.id).await.is_done);

        tasks.toggle_done(&f.cancel, f.alice, task.id, false).await.unwrap();
        let restored = f.only_task(f.inbox.id).await;
        assert!(!restored.is_done);
        assert_eq!(restored.title, task.title);
        assert_eq!(restored.group_id, task.group_id);
    }

    #[tokio::test]
    async fn test_toggle_done_same_value_is_unobservable() {
        let f = fixture().await;
        let tasks = &f.services.tasks;
        let task = tasks.create(&f.cancel, f.alice, f.inbox.id, "Milk", "2 litres").await.unwrap();

        tasks.toggle_done(&f.cancel, f.alice, task.id, true).await.unwrap();
        let first = f.only_task(f.inbox.id).await;

        tasks.toggle_done(&f.cancel, f.alice, task.id, true).await.unwrap();
        let second = f.only_task(f.inbox.id).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_delete_own_task() {
        let f = fixture().await;
        let tasks = &f.services.tasks;
        let task = tasks.create(&f.cancel, f.alice, f.inbox.id, "Milk", "2 litres").await.unwrap();

        tasks.delete(&f.cancel, f.alice, task.id).await.unwrap();
        assert!(tasks.list_by_group(&f.cancel, f.alice, f.inbox.id).await.unwrap().is_empty());

        let err = tasks.delete(&f.cancel, f.alice, task.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
