/// Postgres-backed repositories
///
/// Each ownership-scoped mutation is a single `UPDATE`/`DELETE` filtered by
/// `id AND user_id`; zero affected rows is reported as `NotFound`.
/// Concurrent writers to the same row resolve as last-writer-wins.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::repository::{PgUserRepository, UserRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let users = PgUserRepository::new(pool);
///
/// let alice = users.get_by_username("alice").await?;
/// println!("alice online: {}", alice.is_online);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::postgres::PgQueryResult;
use sqlx::PgPool;

use super::{TaskGroupRepository, TaskRepository, UserRepository};
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{GroupId, NewTask, NewTaskGroup, NewUser, Task, TaskGroup, TaskId, User, UserId};

const USER_COLUMNS: &str =
    "id, username, password_hash, avatar_url, status_text, registered_at, last_active_at, is_online";

const GROUP_COLUMNS: &str = "id, user_id, title, status, created_at";

const TASK_COLUMNS: &str = "id, user_id, group_id, title, body, is_done, created_at, updated_at";

/// Maps "no row matched" onto `NotFound`
fn expect_affected(result: PgQueryResult, entity: &'static str) -> RepositoryResult<()> {
    if result.rows_affected() == 0 {
        Err(RepositoryError::NotFound(entity))
    } else {
        Ok(())
    }
}

/// Like `?`-conversion, but names the entity on `RowNotFound`
fn not_found_as(entity: &'static str) -> impl Fn(sqlx::Error) -> RepositoryError {
    move |err| match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound(entity),
        other => other.into(),
    }
}

/// Users table
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let query = format!(
            r#"
            INSERT INTO users (username, password_hash, avatar_url, status_text, registered_at, is_online)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, User>(&query)
            .bind(user.username)
            .bind(user.password_hash)
            .bind(user.avatar_url)
            .bind(user.status_text)
            .bind(user.registered_at)
            .bind(user.is_online)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get_by_id(&self, id: UserId) -> RepositoryResult<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found_as("User"))
    }

    async fn get_by_username(&self, username: &str) -> RepositoryResult<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found_as("User"))
    }

    async fn update_profile(
        &self,
        id: UserId,
        avatar_url: Option<&str>,
        status_text: &str,
    ) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET avatar_url = $2, status_text = $3 WHERE id = $1")
            .bind(id)
            .bind(avatar_url)
            .bind(status_text)
            .execute(&self.pool)
            .await?;

        expect_affected(result, "User")
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        expect_affected(result, "User")
    }

    async fn set_online(&self, id: UserId, online: bool) -> RepositoryResult<()> {
        // Postgres counts matched rows, so re-applying the same value still reports 1
        let result = sqlx::query("UPDATE users SET is_online = $2 WHERE id = $1")
            .bind(id)
            .bind(online)
            .execute(&self.pool)
            .await?;

        expect_affected(result, "User")
    }

    async fn update_last_active(&self, id: UserId) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET last_active_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        expect_affected(result, "User")
    }
}

/// Task groups table
#[derive(Debug, Clone)]
pub struct PgTaskGroupRepository {
    pool: PgPool,
}

impl PgTaskGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskGroupRepository for PgTaskGroupRepository {
    async fn create(&self, group: NewTaskGroup) -> RepositoryResult<TaskGroup> {
        let query = format!(
            r#"
            INSERT INTO task_groups (user_id, title, status, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {GROUP_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, TaskGroup>(&query)
            .bind(group.user_id)
            .bind(group.title)
            .bind(group.status.as_str())
            .bind(group.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn delete(&self, id: GroupId, owner: UserId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM task_groups WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        expect_affected(result, "Task group")
    }

    async fn update_title(&self, id: GroupId, owner: UserId, title: &str) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE task_groups SET title = $3 WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .bind(title)
            .execute(&self.pool)
            .await?;

        expect_affected(result, "Task group")
    }

    async fn list_by_user(&self, owner: UserId) -> RepositoryResult<Vec<TaskGroup>> {
        let query = format!("SELECT {GROUP_COLUMNS} FROM task_groups WHERE user_id = $1 ORDER BY id");

        let groups = sqlx::query_as::<_, TaskGroup>(&query)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        Ok(groups)
    }
}

/// Tasks table
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, task: NewTask) -> RepositoryResult<Task> {
        let query = format!(
            r#"
            INSERT INTO tasks (user_id, group_id, title, body)
            VALUES ($1, $2, $3, $4)
            RETURNING {TASK_COLUMNS}
            "#
        );

        // A group owned by someone else trips the (group_id, user_id) foreign key
        let created = sqlx::query_as::<_, Task>(&query)
            .bind(task.user_id)
            .bind(task.group_id)
            .bind(task.title)
            .bind(task.body)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn delete(&self, id: TaskId, owner: UserId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        expect_affected(result, "Task")
    }

    async fn update(&self, id: TaskId, owner: UserId, title: &str, body: &str) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $3, body = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(title)
        .bind(body)
        .execute(&self.pool)
        .await?;

        expect_affected(result, "Task")
    }

    async fn move_to_group(&self, id: TaskId, owner: UserId, group_id: GroupId) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET group_id = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(group_id)
        .execute(&self.pool)
        .await?;

        expect_affected(result, "Task")
    }

    async fn set_done(&self, id: TaskId, owner: UserId, done: bool) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET updated_at = CASE WHEN is_done = $3 THEN updated_at ELSE NOW() END,
                is_done = $3
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(done)
        .execute(&self.pool)
        .await?;

        expect_affected(result, "Task")
    }

    async fn list_by_group(&self, owner: UserId, group_id: GroupId) -> RepositoryResult<Vec<Task>> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 AND group_id = $2 ORDER BY id"
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(owner)
            .bind(group_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }
}
