/// Task model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id       INTEGER PRIMARY KEY AUTOINCREMENT,
///     title    TEXT    NOT NULL,
///     is_done  INTEGER NOT NULL DEFAULT 0,
///     user_id  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// );
/// ```
///
/// # Representation
///
/// ```json
/// { "id": 1, "title": "Buy milk", "isDone": false, "userId": 1 }
/// ```
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::models::task::{Task, CreateTask, UpdateTask};
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Buy milk".to_string(),
///     is_done: false,
///     user_id: 1,
/// }).await?;
///
/// Task::update(&pool, task.id, UpdateTask {
///     title: task.title.clone(),
///     is_done: true,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[cfg(feature = "db")]
use sqlx::SqlitePool;

/// Longest accepted task title, in characters
pub const MAX_TITLE_LENGTH: u64 = 200;

/// Task item owned by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-generated ID
    pub id: i64,

    /// Task title (1-200 characters)
    pub title: String,

    /// Whether the task has been completed
    pub is_done: bool,

    /// Owning user
    pub user_id: i64,
}

/// Request body for creating or replacing a task
///
/// PUT uses the same body as POST: both fields are always written, and an
/// omitted `isDone` is stored as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 200,
        message = "Task title must be between 1 and 200 characters"
    ))]
    #[validate(custom(function = "title_not_blank"))]
    pub title: String,

    #[serde(default)]
    pub is_done: bool,
}

impl TaskPayload {
    pub fn new(title: impl Into<String>, is_done: bool) -> Self {
        Self {
            title: title.into(),
            is_done,
        }
    }
}

fn title_not_blank(title: &str) -> Result<(), ValidationError> {
    super::reject_blank(title, "Task title is required")
}

/// Input for inserting a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub is_done: bool,
    /// Owner; must reference an existing user
    pub user_id: i64,
}

impl CreateTask {
    /// Builds the insert for `payload`, owned by `user_id`
    pub fn from_payload(payload: TaskPayload, user_id: i64) -> Self {
        Self {
            title: payload.title,
            is_done: payload.is_done,
            user_id,
        }
    }
}

/// Full replacement of a task's mutable fields
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub title: String,
    pub is_done: bool,
}

impl From<TaskPayload> for UpdateTask {
    fn from(payload: TaskPayload) -> Self {
        Self {
            title: payload.title,
            is_done: payload.is_done,
        }
    }
}

#[cfg(feature = "db")]
impl Task {
    /// Inserts a new task
    ///
    /// # Errors
    ///
    /// Returns a foreign-key violation if `data.user_id` does not reference
    /// an existing user.
    pub async fn create(pool: &SqlitePool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, is_done, user_id)
            VALUES (?, ?, ?)
            RETURNING id, title, is_done, user_id
            "#,
        )
        .bind(data.title)
        .bind(data.is_done)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        tracing::debug!(task_id = task.id, user_id = task.user_id, "Task created");
        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT id, title, is_done, user_id FROM tasks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists every task, ordered by ID
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>("SELECT id, title, is_done, user_id FROM tasks ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Lists the tasks owned by one user, ordered by ID
    pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT id, title, is_done, user_id FROM tasks WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Replaces a task's title and done flag
    ///
    /// Returns `None` if no task has this ID.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = ?, is_done = ?
            WHERE id = ?
            RETURNING id, title, is_done, user_id
            "#,
        )
        .bind(data.title)
        .bind(data.is_done)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a task by ID
    ///
    /// Returns true if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts tasks, optionally restricted to one owner
    pub async fn count(pool: &SqlitePool, user_id: Option<i64>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = match user_id {
            Some(user_id) => {
                sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = ?")
                    .bind(user_id)
                    .fetch_one(pool)
                    .await?
            }
            None => sqlx::query_as("SELECT COUNT(*) FROM tasks").fetch_one(pool).await?,
        };

        Ok(count)
    }
}
