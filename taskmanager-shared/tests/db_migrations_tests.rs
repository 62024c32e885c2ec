/// Integration tests for database migrations and default-owner seeding

use taskmanager_shared::db::migrations::{
    embedded_migration_count, get_migration_status, run_migrations,
};
use taskmanager_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use taskmanager_shared::db::seed::{ensure_default_owner, LOCKED_PASSWORD_HASH};
use taskmanager_shared::models::user::{CreateUser, User};

#[tokio::test]
async fn test_status_before_migrations() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();

    let status = get_migration_status(&pool).await.unwrap();
    assert_eq!(status.applied_migrations, 0);
    assert!(status.latest_version.is_none());
    assert!(!status.is_up_to_date);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_run_migrations() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();

    run_migrations(&pool).await.expect("Migrations failed");

    let status = get_migration_status(&pool).await.unwrap();
    assert_eq!(status.applied_migrations, embedded_migration_count());
    assert!(status.latest_version.is_some());
    assert!(status.is_up_to_date);

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'tasks') ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(tables, vec!["tasks".to_string(), "users".to_string()]);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();

    run_migrations(&pool).await.unwrap();
    let first = get_migration_status(&pool).await.unwrap();

    run_migrations(&pool).await.expect("Second run should be a no-op");
    let second = get_migration_status(&pool).await.unwrap();

    assert_eq!(first.applied_migrations, second.applied_migrations);
    assert_eq!(first.latest_version, second.latest_version);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_seed_default_owner_once() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    assert!(ensure_default_owner(&pool, 1, "owner@taskmanager.local").await.unwrap());
    assert!(ensure_default_owner(&pool, 1, "owner@taskmanager.local").await.unwrap());

    let owner = User::find_by_id(&pool, 1).await.unwrap().unwrap();
    assert_eq!(owner.email, "owner@taskmanager.local");
    assert_eq!(owner.password_hash, LOCKED_PASSWORD_HASH);
    assert_eq!(User::count(&pool).await.unwrap(), 1);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_seed_reports_email_collision() {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    let existing = User::create(
        &pool,
        CreateUser {
            email: "owner@taskmanager.local".to_string(),
            password_hash: "h".to_string(),
        },
    )
    .await
    .unwrap();

    let seeded = ensure_default_owner(&pool, existing.id + 10, "owner@taskmanager.local")
        .await
        .unwrap();
    assert!(!seeded);
    assert_eq!(User::count(&pool).await.unwrap(), 1);

    close_pool(pool).await;
}
