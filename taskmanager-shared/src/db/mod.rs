/// Database layer for Task Manager
///
/// This module provides connection pooling, migrations, and seeding for the
/// SQLite store.
///
/// # Modules
///
/// - `pool`: SQLite connection pool management with health checks
/// - `migrations`: Embedded schema migrations
/// - `seed`: Default task owner provisioning
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
pub mod seed;
