/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `tasks`: Task CRUD endpoints
/// - `users`: User CRUD endpoints (users are returned with their tasks)

pub mod health;
pub mod tasks;
pub mod users;

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

/// `201 Created` with a `Location` header pointing at the new resource
pub(crate) fn created<T: Serialize>(location: String, body: T) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
}
