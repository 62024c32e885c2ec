/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A fresh in-memory store per test, migrated and seeded
/// - Request helpers that drive the router without a socket
/// - User/task creation shortcuts

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use sqlx::SqlitePool;
use taskmanager_api::app::{build_router, init_state};
use taskmanager_api::config::Config;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub config: Config,
}

/// Status, headers and parsed body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestContext {
    /// Creates a new test context over a private in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_config(Config::in_memory()).await
    }

    /// Creates a test context with a custom configuration
    pub async fn with_config(config: Config) -> anyhow::Result<Self> {
        let state = init_state(config.clone()).await?;
        let db = state.db.clone();
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request with an optional JSON body
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a raw JSON string as the body, for malformed payloads
    pub async fn send_raw(&self, method: Method, uri: &str, raw: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_string()))
            .unwrap();

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();
        into_test_response(response).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Creates a user through the API and returns its id
    pub async fn create_user(&self, email: &str) -> i64 {
        let response = self
            .post(
                "/users",
                serde_json::json!({ "email": email, "passwordHash": "test_hash" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }

    /// Creates a task for the default owner and returns its id
    pub async fn create_task(&self, title: &str) -> i64 {
        let response = self
            .post("/tasks", serde_json::json!({ "title": title }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}

async fn into_test_response(response: Response) -> TestResponse {
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(String::from);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        location,
        body,
    }
}
