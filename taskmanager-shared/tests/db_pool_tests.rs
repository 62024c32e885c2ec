/// Integration tests for the database connection pool
///
/// These run against private SQLite databases (in-memory or a temp file), so
/// no external service is needed.

use taskmanager_shared::db::pool::{
    close_pool, create_pool, get_pool_stats, health_check, DatabaseConfig,
};

fn temp_database_url(name: &str) -> (String, std::path::PathBuf) {
    let path = std::env::temp_dir().join(format!(
        "taskmanager-{}-{}.db",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    (format!("sqlite://{}", path.display()), path)
}

#[tokio::test]
async fn test_create_in_memory_pool() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    let stats = get_pool_stats(&pool);
    assert_eq!(stats.total_connections, 1);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_create_pool_creates_missing_file() {
    let (url, path) = temp_database_url("pool-create");

    let pool = create_pool(DatabaseConfig {
        url,
        max_connections: 2,
        ..Default::default()
    })
    .await
    .expect("Failed to create pool");

    assert!(path.exists(), "Database file should be created on first connect");

    close_pool(pool).await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_create_pool_with_invalid_url() {
    let config = DatabaseConfig {
        url: "sqlite:///nonexistent-taskmanager-dir/nested/tasks.db".to_string(),
        connect_timeout_seconds: 2,
        ..DatabaseConfig::in_memory()
    };

    let result = create_pool(config).await;
    assert!(result.is_err(), "Should fail when the database file cannot be created");
}

#[tokio::test]
async fn test_health_check_success() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    assert!(health_check(&pool).await.is_ok(), "Health check should succeed");

    close_pool(pool).await;
}

#[tokio::test]
async fn test_foreign_keys_enabled() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    let (enabled,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await
        .expect("Failed to read pragma");
    assert_eq!(enabled, 1);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_in_memory_state_survives_between_queries() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    sqlx::query("CREATE TABLE scratch (v INTEGER)")
        .execute(&pool)
        .await
        .expect("Failed to create table");

    for i in 0..5i64 {
        sqlx::query("INSERT INTO scratch (v) VALUES (?)")
            .bind(i)
            .execute(&pool)
            .await
            .expect("Failed to insert");
    }

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scratch")
        .fetch_one(&pool)
        .await
        .expect("Failed to count");
    assert_eq!(count, 5);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_get_pool_stats_with_active_connection() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    let conn = pool.acquire().await.expect("Failed to acquire connection");

    let stats = get_pool_stats(&pool);
    assert_eq!(stats.active_connections, 1);
    assert_eq!(stats.idle_connections, 0);

    drop(conn);
    close_pool(pool).await;
}
