/// End-to-end tests: the real API router served on an ephemeral port,
/// driven through `HttpClient` and `TaskView`.

use taskmanager_api::app::{build_router, init_state};
use taskmanager_api::config::Config;
use taskmanager_client::api::{ClientError, HttpClient, TaskApi};
use taskmanager_client::view::{BannerKind, Key, TaskView};
use taskmanager_shared::models::{TaskPayload, UserPayload};
use tokio::net::TcpListener;

/// Starts a server over a fresh in-memory store and returns a client for it
async fn spawn_server() -> HttpClient {
    let state = init_state(Config::in_memory()).await.unwrap();
    let router = build_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    HttpClient::new(format!("http://{}", addr)).unwrap()
}

#[tokio::test]
async fn test_view_round_trip_against_server() {
    let client = spawn_server().await;
    let mut view = TaskView::new(client.clone());

    assert!(view.load().await);
    assert!(view.tasks().is_empty());

    assert!(view.create("Buy milk").await);
    let id = view.tasks()[0].id;
    assert_eq!(view.tasks()[0].user_id, 1);

    assert!(view.toggle(id).await);
    assert!(view.begin_edit(id));
    view.set_edit_text("Buy oat milk");
    assert!(view.handle_key(Key::Enter).await);

    // The local list matches what the server now holds
    let remote = client.list_tasks().await.unwrap();
    assert_eq!(view.tasks(), remote.as_slice());
    assert_eq!(remote[0].title, "Buy oat milk");
    assert!(remote[0].is_done);

    assert!(view.delete(id).await);
    assert!(client.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_server_errors_are_typed() {
    let client = spawn_server().await;

    let invalid = client
        .create_task(&TaskPayload::new("a".repeat(201), false))
        .await;
    match invalid {
        Err(ClientError::Validation(details)) => assert_eq!(details[0].field, "title"),
        other => panic!("Expected Validation, got {:?}", other),
    }

    let missing = client
        .update_task(404, &TaskPayload::new("Ghost", true))
        .await;
    assert!(matches!(missing, Err(ClientError::NotFound(_))));
    assert!(matches!(
        client.delete_task(404).await,
        Err(ClientError::NotFound(_))
    ));

    let payload = UserPayload::new("dup@example.com", "h");
    client.create_user(&payload).await.unwrap();
    assert!(matches!(
        client.create_user(&payload).await,
        Err(ClientError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_view_reports_task_deleted_elsewhere() {
    let client = spawn_server().await;
    let mut view = TaskView::new(client.clone());

    view.load().await;
    view.create("Shared").await;
    let id = view.tasks()[0].id;

    client.delete_task(id).await.unwrap();

    assert!(!view.toggle(id).await);
    assert_eq!(view.tasks().len(), 1);
    let banner = view.banner().unwrap();
    assert_eq!(banner.kind, BannerKind::Error);
    assert_eq!(banner.message, "That task no longer exists.");
}

#[tokio::test]
async fn test_user_endpoints() {
    let client = spawn_server().await;

    let created = client
        .create_user(&UserPayload::new("a@x.com", "h"))
        .await
        .unwrap();
    assert!(created.tasks.is_empty());

    let updated = client
        .update_user(created.id, &UserPayload::new("b@x.com", "h2"))
        .await
        .unwrap();
    assert_eq!(updated.email, "b@x.com");

    let fetched = client.get_user(created.id).await.unwrap();
    assert_eq!(fetched, updated);

    let users = client.list_users().await.unwrap();
    assert!(users.iter().any(|user| user.email == "b@x.com"));

    client.delete_user(created.id).await.unwrap();
    assert!(matches!(
        client.get_user(created.id).await,
        Err(ClientError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(format!("http://{}", addr)).unwrap();
    assert!(matches!(
        client.list_tasks().await,
        Err(ClientError::Transport(_))
    ));

    let mut view = TaskView::new(client);
    assert!(!view.load().await);
    assert!(!view.is_loaded());
    assert_eq!(
        view.banner().unwrap().message,
        "Failed to load tasks. Please try again."
    );
}
