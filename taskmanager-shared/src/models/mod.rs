/// Data models for Task Manager
///
/// # Models
///
/// - `user`: User accounts, which own tasks
/// - `task`: Task items with a title and a done flag
///
/// Each model provides its JSON representation (camelCase field names), the
/// request payload accepted by the API, and, with the `db` feature, CRUD
/// operations against a `SqlitePool`.
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
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;

use std::borrow::Cow;
use validator::ValidationError;

/// Rejects values made only of whitespace
///
/// Empty strings pass here; the `length` rules report those.
pub(crate) fn reject_blank(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed(message));
        return Err(error);
    }
    Ok(())
}

pub use task::{Task, TaskPayload};
pub use user::{User, UserPayload, UserWithTasks};
