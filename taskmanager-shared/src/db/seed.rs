/// Default task owner provisioning
///
/// Tasks created without an authenticated caller are assigned to a configured
/// default owner. That owner row has to exist before the first task is
/// inserted, otherwise the foreign key on `tasks.user_id` rejects the write.

use sqlx::SqlitePool;
use tracing::{info, warn};

/// Password hash stored for the seeded owner. No login path exists, and the
/// value can never be produced by a real hashing scheme.
pub const LOCKED_PASSWORD_HASH: &str = "!";

/// Ensures a user row with `id` exists, inserting it with `email` if missing
///
/// Returns `true` if the owner exists after the call. Returns `false` when the
/// row could not be created because `email` is already taken by a different
/// user; task creation will then report the missing owner.
pub async fn ensure_default_owner(
    pool: &SqlitePool,
    id: i64,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (id, email, password_hash) VALUES (?, ?, ?) ON CONFLICT DO NOTHING",
    )
    .bind(id)
    .bind(email)
    .bind(LOCKED_PASSWORD_HASH)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        info!(user_id = id, email, "Seeded default task owner");
        return Ok(true);
    }

    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    if !exists {
        warn!(
            user_id = id,
            email, "Default task owner could not be seeded; email belongs to another user"
        );
    }

    Ok(exists)
}
