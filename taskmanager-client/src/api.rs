/// HTTP client for the Task Manager API
///
/// `TaskApi` is the seam the task view depends on. `HttpClient` implements it
/// over reqwest and additionally exposes the user endpoints.
///
/// # Error mapping
///
/// ```text
/// 400 validation_error  -> ClientError::Validation(details)
/// 400 bad_request       -> ClientError::BadRequest(message)
/// 404                   -> ClientError::NotFound(message)
/// 409                   -> ClientError::Conflict(message)
/// other non-2xx         -> ClientError::Server { status, message }
/// connection failures   -> ClientError::Transport
/// unreadable body       -> ClientError::Decode
/// ```
///
/// # Example
///
/// ```no_run
/// use taskmanager_client::api::{HttpClient, TaskApi};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new("http://127.0.0.1:8080")?;
/// for task in client.list_tasks().await? {
///     println!("{} {}", task.id, task.title);
/// }
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use taskmanager_shared::models::{Task, TaskPayload, UserPayload, UserWithTasks};

/// Client error types
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server rejected one or more fields
    #[error("Validation failed: {}", join_details(.0))]
    Validation(Vec<FieldError>),

    /// Malformed request (bad JSON, bad id)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The write collides with existing data
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The request never got a response
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not what the API promises
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Field-level validation message returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(default)]
    details: Option<Vec<FieldError>>,
}

fn join_details(details: &[FieldError]) -> String {
    details
        .iter()
        .map(|detail| detail.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Operations the task view needs from the server
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Lists every task
    async fn list_tasks(&self) -> ClientResult<Vec<Task>>;

    /// Creates a task owned by the caller
    async fn create_task(&self, payload: &TaskPayload) -> ClientResult<Task>;

    /// Replaces a task's title and done flag
    async fn update_task(&self, id: i64, payload: &TaskPayload) -> ClientResult<Task>;

    /// Deletes a task
    async fn delete_task(&self, id: i64) -> ClientResult<()>;
}

/// reqwest-backed API client
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpClient {
    /// Creates a client for the server at `base_url`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if `base_url` is not an http(s) URL.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Base URL requests are sent to, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Lists every user with their tasks
    pub async fn list_users(&self) -> ClientResult<Vec<UserWithTasks>> {
        let response = self.http.get(self.url("/users")).send().await?;
        read_json(response).await
    }

    /// Gets one user with their tasks
    pub async fn get_user(&self, id: i64) -> ClientResult<UserWithTasks> {
        let response = self
            .http
            .get(self.url(&format!("/users/{}", id)))
            .send()
            .await?;
        read_json(response).await
    }

    /// Creates a user
    pub async fn create_user(&self, payload: &UserPayload) -> ClientResult<UserWithTasks> {
        let response = self
            .http
            .post(self.url("/users"))
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    /// Replaces a user's email and password hash
    pub async fn update_user(&self, id: i64, payload: &UserPayload) -> ClientResult<UserWithTasks> {
        let response = self
            .http
            .put(self.url(&format!("/users/{}", id)))
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    /// Deletes a user and their tasks
    pub async fn delete_user(&self, id: i64) -> ClientResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/users/{}", id)))
            .send()
            .await?;
        read_empty(response).await
    }
}

#[async_trait]
impl TaskApi for HttpClient {
    async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
        let response = self.http.get(self.url("/tasks")).send().await?;
        read_json(response).await
    }

    async fn create_task(&self, payload: &TaskPayload) -> ClientResult<Task> {
        let response = self
            .http
            .post(self.url("/tasks"))
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    async fn update_task(&self, id: i64, payload: &TaskPayload) -> ClientResult<Task> {
        let response = self
            .http
            .put(self.url(&format!("/tasks/{}", id)))
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete_task(&self, id: i64) -> ClientResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/tasks/{}", id)))
            .send()
            .await?;
        read_empty(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn read_empty(response: Response) -> ClientResult<()> {
    check_status(response).await?;
    Ok(())
}

async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let error = error_from_body(status, &text);
    tracing::debug!(status = status.as_u16(), error = %error, "Request failed");
    Err(error)
}

/// Maps a failed response to a `ClientError`
fn error_from_body(status: StatusCode, text: &str) -> ClientError {
    let body: Option<ErrorBody> = serde_json::from_str(text).ok();
    let message = body
        .as_ref()
        .map(|b| b.message.clone())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string()
        });

    match status {
        StatusCode::BAD_REQUEST => match body {
            Some(ErrorBody {
                details: Some(details),
                ..
            }) => ClientError::Validation(details),
            _ => ClientError::BadRequest(message),
        },
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::CONFLICT => ClientError::Conflict(message),
        _ => ClientError::Server {
            status: status.as_u16(),
            message: match body {
                Some(b) if !b.error.is_empty() => format!("{} ({})", message, b.error),
                _ => message,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body() {
        let text = r#"{"error":"validation_error","message":"Request validation failed","details":[{"field":"title","message":"Task title must be between 1 and 200 characters"}]}"#;

        match error_from_body(StatusCode::BAD_REQUEST, text) {
            ClientError::Validation(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "title");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_request_without_details() {
        let text = r#"{"error":"bad_request","message":"Failed to parse the request body as JSON"}"#;
        assert!(matches!(
            error_from_body(StatusCode::BAD_REQUEST, text),
            ClientError::BadRequest(msg) if msg.contains("parse")
        ));
    }

    #[test]
    fn test_not_found_and_conflict() {
        let not_found = r#"{"error":"not_found","message":"Task with ID 4 not found"}"#;
        assert!(matches!(
            error_from_body(StatusCode::NOT_FOUND, not_found),
            ClientError::NotFound(msg) if msg == "Task with ID 4 not found"
        ));

        let conflict = r#"{"error":"conflict","message":"User with this email already exists"}"#;
        assert!(matches!(
            error_from_body(StatusCode::CONFLICT, conflict),
            ClientError::Conflict(_)
        ));
    }

    #[test]
    fn test_unparseable_body_falls_back_to_reason() {
        match error_from_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") {
            ClientError::Server { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("Expected Server, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_display_joins_messages() {
        let err = ClientError::Validation(vec![
            FieldError {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            FieldError {
                field: "passwordHash".to_string(),
                message: "Password hash is required".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Invalid email format; Password hash is required"
        );
    }

    #[test]
    fn test_base_url_is_normalised() {
        let client = HttpClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/tasks"), "http://localhost:8080/tasks");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpClient::new("ftp://example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
