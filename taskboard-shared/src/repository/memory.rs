/// In-process repository backing
///
/// Mirrors the Postgres schema's guarantees: unique usernames, owner-filtered
/// mutations, the `(group_id, user_id)` foreign key on tasks, and cascading
/// task removal when a group is deleted. A single `RwLock` makes every
/// operation atomic.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskboard_shared::repository::{InMemoryStore, TaskGroupRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(InMemoryStore::new());
/// let groups: Arc<dyn TaskGroupRepository> = store.clone();
/// assert!(groups.list_by_user(1).await?.is_empty());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{TaskGroupRepository, TaskRepository, UserRepository};
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{GroupId, NewTask, NewTaskGroup, NewUser, Task, TaskGroup, TaskId, User, UserId};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    groups: BTreeMap<GroupId, TaskGroup>,
    tasks: BTreeMap<TaskId, Task>,
    next_user_id: UserId,
    next_group_id: GroupId,
    next_task_id: TaskId,
}

impl Tables {
    fn owned_group(&self, id: GroupId, owner: UserId) -> Option<&TaskGroup> {
        self.groups.get(&id).filter(|group| group.user_id == owner)
    }

    fn owned_task_mut(&mut self, id: TaskId, owner: UserId) -> RepositoryResult<&mut Task> {
        self.tasks
            .get_mut(&id)
            .filter(|task| task.user_id == owner)
            .ok_or(RepositoryError::NotFound("Task"))
    }

    fn user_mut(&mut self, id: UserId) -> RepositoryResult<&mut User> {
        self.users.get_mut(&id).ok_or(RepositoryError::NotFound("User"))
    }
}

/// Users, groups and tasks held in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict("Username already taken".to_string()));
        }

        tables.next_user_id += 1;
        let created = User {
            id: tables.next_user_id,
            username: user.username,
            password_hash: user.password_hash,
            avatar_url: user.avatar_url,
            status_text: user.status_text,
            registered_at: user.registered_at,
            last_active_at: None,
            is_online: user.is_online,
        };
        tables.users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn get_by_id(&self, id: UserId) -> RepositoryResult<User> {
        let tables = self.tables.read().await;
        tables.users.get(&id).cloned().ok_or(RepositoryError::NotFound("User"))
    }

    async fn get_by_username(&self, username: &str) -> RepositoryResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(RepositoryError::NotFound("User"))
    }

    async fn update_profile(
        &self,
        id: UserId,
        avatar_url: Option<&str>,
        status_text: &str,
    ) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables.user_mut(id)?;
        user.avatar_url = avatar_url.map(str::to_string);
        user.status_text = status_text.to_string();
        Ok(())
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        tables.user_mut(id)?.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn set_online(&self, id: UserId, online: bool) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        tables.user_mut(id)?.is_online = online;
        Ok(())
    }

    async fn update_last_active(&self, id: UserId) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        tables.user_mut(id)?.last_active_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl TaskGroupRepository for InMemoryStore {
    async fn create(&self, group: NewTaskGroup) -> RepositoryResult<TaskGroup> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&group.user_id) {
            return Err(RepositoryError::NotFound("User"));
        }

        tables.next_group_id += 1;
        let created = TaskGroup {
            id: tables.next_group_id,
            user_id: group.user_id,
            title: group.title,
            status: group.status,
            created_at: group.created_at,
        };
        tables.groups.insert(created.id, created.clone());

        Ok(created)
    }

    async fn delete(&self, id: GroupId, owner: UserId) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;

        if tables.owned_group(id, owner).is_none() {
            return Err(RepositoryError::NotFound("Task group"));
        }

        tables.groups.remove(&id);
        tables.tasks.retain(|_, task| task.group_id != id);
        Ok(())
    }

    async fn update_title(&self, id: GroupId, owner: UserId, title: &str) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;

        let group = tables
            .groups
            .get_mut(&id)
            .filter(|group| group.user_id == owner)
            .ok_or(RepositoryError::NotFound("Task group"))?;
        group.title = title.to_string();
        Ok(())
    }

    async fn list_by_user(&self, owner: UserId) -> RepositoryResult<Vec<TaskGroup>> {
        let tables = self.tables.read().await;
        Ok(tables
            .groups
            .values()
            .filter(|group| group.user_id == owner)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn create(&self, task: NewTask) -> RepositoryResult<Task> {
        let mut tables = self.tables.write().await;

        if tables.owned_group(task.group_id, task.user_id).is_none() {
            return Err(RepositoryError::NotFound("Task group"));
        }

        tables.next_task_id += 1;
        let now = Utc::now();
        let created = Task {
            id: tables.next_task_id,
            user_id: task.user_id,
            group_id: task.group_id,
            title: task.title,
            body: task.body,
            is_done: false,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(created.id, created.clone());

        Ok(created)
    }

    async fn delete(&self, id: TaskId, owner: UserId) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        tables.owned_task_mut(id, owner)?;
        tables.tasks.remove(&id);
        Ok(())
    }

    async fn update(&self, id: TaskId, owner: UserId, title: &str, body: &str) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        let task = tables.owned_task_mut(id, owner)?;
        task.title = title.to_string();
        task.body = body.to_string();
        task.updated_at = Utc::now();
        Ok(())
    }

    async fn move_to_group(&self, id: TaskId, owner: UserId, group_id: GroupId) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;

        tables.owned_task_mut(id, owner)?;
        if tables.owned_group(group_id, owner).is_none() {
            return Err(RepositoryError::NotFound("Task group"));
        }

        let task = tables.owned_task_mut(id, owner)?;
        task.group_id = group_id;
        task.updated_at = Utc::now();
        Ok(())
    }

    async fn set_done(&self, id: TaskId, owner: UserId, done: bool) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        let task = tables.owned_task_mut(id, owner)?;
        if task.is_done != done {
            task.is_done = done;
            task.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_by_group(&self, owner: UserId, group_id: GroupId) -> RepositoryResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|task| task.user_id == owner && task.group_id == group_id)
            .cloned()
            .collect())
    }
}
