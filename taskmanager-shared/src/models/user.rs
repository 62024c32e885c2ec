/// User model and database operations
///
/// Users own tasks. The password hash is stored as an opaque string; nothing
/// in this system verifies it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id            INTEGER PRIMARY KEY AUTOINCREMENT,
///     email         TEXT    NOT NULL UNIQUE COLLATE NOCASE,
///     password_hash TEXT    NOT NULL
/// );
/// ```
///
/// # Representation
///
/// Users are always returned with their tasks included:
///
/// ```json
/// { "id": 1, "email": "a@x.com", "passwordHash": "h", "tasks": [] }
/// ```
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::models::user::{User, CreateUser};
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "opaque".to_string(),
/// }).await?;
///
/// let with_tasks = User::find_with_tasks(&pool, user.id).await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::task::Task;

#[cfg(feature = "db")]
use sqlx::SqlitePool;
#[cfg(feature = "db")]
use std::collections::HashMap;

/// User account row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-generated ID
    pub id: i64,

    /// Email address, unique across users (case-insensitive)
    pub email: String,

    /// Opaque password hash
    pub password_hash: String,
}

/// User representation with owned tasks included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithTasks {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl User {
    /// Attaches owned tasks to build the user's representation
    pub fn with_tasks(self, tasks: Vec<Task>) -> UserWithTasks {
        UserWithTasks {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            tasks,
        }
    }
}

/// Request body for creating or replacing a user
///
/// An empty email is rejected by the handlers before these rules run, so it
/// gets a dedicated "Email is required" message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(default)]
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email cannot exceed 100 characters")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password hash is required"))]
    #[validate(custom(function = "password_hash_not_blank"))]
    pub password_hash: String,
}

impl UserPayload {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Whether the email is missing or whitespace only
    pub fn email_is_blank(&self) -> bool {
        self.email.trim().is_empty()
    }
}

fn password_hash_not_blank(password_hash: &str) -> Result<(), ValidationError> {
    super::reject_blank(password_hash, "Password hash is required")
}

/// Input for inserting a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
}

/// Full replacement of a user's email and password hash
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub email: String,
    pub password_hash: String,
}

impl From<UserPayload> for CreateUser {
    fn from(payload: UserPayload) -> Self {
        Self {
            email: payload.email,
            password_hash: payload.password_hash,
        }
    }
}

impl From<UserPayload> for UpdateUser {
    fn from(payload: UserPayload) -> Self {
        Self {
            email: payload.email,
            password_hash: payload.password_hash,
        }
    }
}

#[cfg(feature = "db")]
impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns a unique violation if the email already exists.
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES (?, ?)
            RETURNING id, email, password_hash
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        tracing::debug!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, email, password_hash FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email address (case-insensitive)
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, email, password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether a user other than `id` already has `email`
    pub async fn email_taken_by_other(
        pool: &SqlitePool,
        email: &str,
        id: i64,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = ? AND id != ?)")
            .bind(email)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Whether a user with this ID exists
    pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = ?)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Lists every user, ordered by ID
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, email, password_hash FROM users ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Lists every user with their tasks
    ///
    /// Two queries: all users, then all tasks grouped by owner.
    pub async fn list_with_tasks(pool: &SqlitePool) -> Result<Vec<UserWithTasks>, sqlx::Error> {
        let users = Self::list(pool).await?;
        let mut tasks_by_user: HashMap<i64, Vec<Task>> = HashMap::new();
        for task in Task::list(pool).await? {
            tasks_by_user.entry(task.user_id).or_default().push(task);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let tasks = tasks_by_user.remove(&user.id).unwrap_or_default();
                user.with_tasks(tasks)
            })
            .collect())
    }

    /// Finds a user by ID with their tasks
    pub async fn find_with_tasks(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<UserWithTasks>, sqlx::Error> {
        let Some(user) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let tasks = Task::list_by_user(pool, id).await?;
        Ok(Some(user.with_tasks(tasks)))
    }

    /// Overwrites a user's email and password hash
    ///
    /// Returns `None` if no user has this ID.
    ///
    /// # Errors
    ///
    /// Returns a unique violation if another user already has the email.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = ?, password_hash = ?
            WHERE id = ?
            RETURNING id, email, password_hash
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a user by ID; their tasks are removed by the cascading foreign key
    ///
    /// Returns true if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of users
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_representation_includes_tasks() {
        let user = User {
            id: 7,
            email: "a@x.com".to_string(),
            password_hash: "h".to_string(),
        };

        let json = serde_json::to_value(user.with_tasks(vec![])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "email": "a@x.com", "passwordHash": "h", "tasks": []})
        );
    }

    #[test]
    fn test_payload_validation() {
        assert!(UserPayload::new("a@x.com", "h").validate().is_ok());

        let errors = UserPayload::new("not-an-email", "h").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let errors = UserPayload::new("a@x.com", "").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_hash"));

        let errors = UserPayload::new("a@x.com", "   ").validate().unwrap_err();
        let hash_errors = errors.field_errors()["password_hash"];
        assert_eq!(hash_errors.len(), 1);
        assert_eq!(
            hash_errors[0].message.as_deref(),
            Some("Password hash is required")
        );
    }

    #[test]
    fn test_email_max_length() {
        let local = "a".repeat(60);
        let domain = format!("{}.com", "b".repeat(40));
        let email = format!("{}@{}", local, domain);
        assert!(email.len() > 100);
        let errors = UserPayload::new(email, "h").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_blank_email_detection() {
        assert!(UserPayload::new("", "h").email_is_blank());
        assert!(UserPayload::new("   ", "h").email_is_blank());
        assert!(!UserPayload::new("a@x.com", "h").email_is_blank());
    }
}
