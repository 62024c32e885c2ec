/// Task endpoints
///
/// # Endpoints
///
/// - `GET /tasks` - List all tasks
/// - `POST /tasks` - Create a task owned by the caller
/// - `PUT /tasks/:id` - Replace a task's title and done flag
/// - `DELETE /tasks/:id` - Delete a task
///
/// Updates are full replacements: the body must carry the whole task, and an
/// omitted `isDone` is written as `false`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, CallerContext},
    routes::created,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use taskmanager_shared::models::{
    task::{CreateTask, Task, TaskPayload},
    user::User,
};
use tracing::info;
use validator::Validate;

fn task_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Task with ID {} not found", id))
}

/// List tasks
///
/// # Response
///
/// ```json
/// [{ "id": 1, "title": "Buy milk", "isDone": false, "userId": 1 }]
/// ```
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list(&state.db).await?;
    Ok(Json(tasks))
}

/// Create a task
///
/// The owner is always taken from the caller context; any `userId` in the
/// body is ignored.
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// { "title": "Buy milk", "isDone": false }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or title not 1-200 characters
/// - `409 Conflict`: The caller's user does not exist
pub async fn create_task(
    State(state): State<AppState>,
    caller: CallerContext,
    ApiJson(payload): ApiJson<TaskPayload>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;

    if !User::exists(&state.db, caller.user_id).await? {
        return Err(ApiError::Conflict(format!(
            "Task owner with ID {} does not exist",
            caller.user_id
        )));
    }

    let task = Task::create(&state.db, CreateTask::from_payload(payload, caller.user_id)).await?;
    info!(task_id = task.id, user_id = task.user_id, "Task created");

    Ok(created(format!("/tasks/{}", task.id), task))
}

/// Replace a task
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID
/// - `400 Bad Request`: Malformed body or invalid title
pub async fn update_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<TaskPayload>,
) -> ApiResult<Json<Task>> {
    if Task::find_by_id(&state.db, id).await?.is_none() {
        return Err(task_not_found(id));
    }

    payload.validate()?;

    let task = Task::update(&state.db, id, payload.into())
        .await?
        .ok_or_else(|| task_not_found(id))?;
    info!(task_id = task.id, is_done = task.is_done, "Task updated");

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID
pub async fn delete_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    if !Task::delete(&state.db, id).await? {
        return Err(task_not_found(id));
    }

    info!(task_id = id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}
