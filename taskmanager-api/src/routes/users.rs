/// User endpoints
///
/// # Endpoints
///
/// - `GET /users` - List all users with their tasks
/// - `GET /users/:id` - Get one user with their tasks
/// - `POST /users` - Create a user
/// - `PUT /users/:id` - Replace a user's email and password hash
/// - `DELETE /users/:id` - Delete a user and, by cascade, their tasks
///
/// Emails are unique across users, compared case-insensitively.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::created,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use taskmanager_shared::models::user::{User, UserPayload, UserWithTasks};
use tracing::info;
use validator::Validate;

fn user_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("User with ID {} not found", id))
}

fn validate_user(payload: &UserPayload) -> ApiResult<()> {
    if payload.email_is_blank() {
        return Err(ApiError::invalid_field("email", "Email is required"));
    }
    payload.validate()?;
    Ok(())
}

/// List users with their tasks
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserWithTasks>>> {
    let users = User::list_with_tasks(&state.db).await?;
    Ok(Json(users))
}

/// Get one user with their tasks
///
/// # Errors
///
/// - `404 Not Found`: `User with ID {id} not found`
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<UserWithTasks>> {
    let user = User::find_with_tasks(&state.db, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    Ok(Json(user))
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// { "email": "a@x.com", "passwordHash": "h" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Empty or malformed email, or missing password hash
/// - `409 Conflict`: Email already exists
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UserPayload>,
) -> ApiResult<impl IntoResponse> {
    validate_user(&payload)?;

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        return Err(ApiError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let user = User::create(&state.db, payload.into()).await?;
    info!(user_id = user.id, "User created");

    Ok(created(format!("/users/{}", user.id), user.with_tasks(Vec::new())))
}

/// Replace a user's email and password hash
///
/// Keeping the user's own current email is not a conflict.
///
/// # Errors
///
/// - `404 Not Found`: No user with this ID
/// - `400 Bad Request`: Empty or malformed email, or missing password hash
/// - `409 Conflict`: Email belongs to a different user
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UserPayload>,
) -> ApiResult<Json<UserWithTasks>> {
    if !User::exists(&state.db, id).await? {
        return Err(user_not_found(id));
    }

    validate_user(&payload)?;

    if User::email_taken_by_other(&state.db, &payload.email, id).await? {
        return Err(ApiError::Conflict(
            "Email already in use by another user".to_string(),
        ));
    }

    User::update(&state.db, id, payload.into())
        .await?
        .ok_or_else(|| user_not_found(id))?;
    info!(user_id = id, "User updated");

    let user = User::find_with_tasks(&state.db, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    Ok(Json(user))
}

/// Delete a user; their tasks are removed with them
///
/// # Errors
///
/// - `404 Not Found`: No user with this ID
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    if !User::delete(&state.db, id).await? {
        return Err(user_not_found(id));
    }

    info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
