/// Task list view model
///
/// Mirrors the server's task collection in memory and applies each mutation
/// locally from the server's response instead of re-fetching the list.
///
/// # State flow
///
/// ```text
/// action ──> TaskApi call ──┬─> Ok(task)  ──> merge into list, success banner
///                           └─> Err(e)    ──> list untouched, error banner
/// ```
///
/// | Action  | Local update      |
/// |---------|-------------------|
/// | create  | append            |
/// | toggle  | replace by id     |
/// | edit    | replace by id     |
/// | delete  | remove by id      |
///
/// Banners expire `BANNER_TTL` after they are raised. Time is passed in by
/// the caller so rendering stays deterministic.

use crate::api::{ClientError, TaskApi};
use std::time::{Duration, Instant};
use taskmanager_shared::models::{Task, TaskPayload};
use tracing::{debug, warn};

/// How long a banner stays visible
pub const BANNER_TTL: Duration = Duration::from_secs(3);

/// Banner severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Transient message shown above the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    raised_at: Instant,
}

impl Banner {
    fn new(kind: BannerKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Instant::now(),
        }
    }

    /// When the banner was raised
    pub fn raised_at(&self) -> Instant {
        self.raised_at
    }

    /// Whether the banner has timed out at `now`
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= BANNER_TTL
    }
}

/// Keys the inline editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

/// Task counts shown under the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Clone)]
struct EditBuffer {
    id: i64,
    text: String,
}

/// View model over a `TaskApi`
pub struct TaskView<A: TaskApi> {
    api: A,
    tasks: Vec<Task>,
    editing: Option<EditBuffer>,
    banner: Option<Banner>,
    loaded: bool,
}

impl<A: TaskApi> TaskView<A> {
    /// Creates an empty view; call `load` once to fill it
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            editing: None,
            banner: None,
            loaded: false,
        }
    }

    /// Tasks as currently known locally
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Whether the initial load has succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Underlying API client
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches the task list from the server
    ///
    /// On failure the local list is left as it was.
    pub async fn load(&mut self) -> bool {
        match self.api.list_tasks().await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "Loaded tasks");
                self.tasks = tasks;
                self.loaded = true;
                true
            }
            Err(e) => {
                self.fail("load tasks", &e);
                false
            }
        }
    }

    /// Creates a task from user input
    ///
    /// The title is trimmed; an empty result never reaches the server.
    pub async fn create(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            self.raise(BannerKind::Error, "Task title cannot be empty");
            return false;
        }

        match self.api.create_task(&TaskPayload::new(title, false)).await {
            Ok(task) => {
                self.tasks.push(task);
                self.raise(BannerKind::Success, "Task created successfully!");
                true
            }
            Err(e) => {
                self.fail("create task", &e);
                false
            }
        }
    }

    /// Flips a task's done flag
    pub async fn toggle(&mut self, id: i64) -> bool {
        let Some(task) = self.find(id) else {
            self.raise(BannerKind::Error, missing_message(id));
            return false;
        };

        let payload = TaskPayload::new(task.title.clone(), !task.is_done);
        match self.api.update_task(id, &payload).await {
            Ok(updated) => {
                let message = if updated.is_done {
                    "Task marked as done!"
                } else {
                    "Task marked as undone!"
                };
                self.replace(updated);
                self.raise(BannerKind::Success, message);
                true
            }
            Err(e) => {
                self.fail("update task", &e);
                false
            }
        }
    }

    /// Opens the inline editor for a task, seeded with its current title
    pub fn begin_edit(&mut self, id: i64) -> bool {
        match self.find(id) {
            Some(task) => {
                self.editing = Some(EditBuffer {
                    id,
                    text: task.title.clone(),
                });
                true
            }
            None => false,
        }
    }

    /// Replaces the edit buffer's text
    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(buffer) = self.editing.as_mut() {
            buffer.text = text.into();
        }
    }

    /// Task id and text of the open editor, if any
    pub fn editing(&self) -> Option<(i64, &str)> {
        self.editing
            .as_ref()
            .map(|buffer| (buffer.id, buffer.text.as_str()))
    }

    /// Discards the edit buffer
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Saves the edit buffer as the task's new title
    ///
    /// The done flag is sent unchanged since updates replace the whole task.
    /// The editor stays open when the title is empty or the request fails.
    pub async fn commit_edit(&mut self) -> bool {
        let Some(buffer) = self.editing.clone() else {
            return false;
        };

        let title = buffer.text.trim();
        if title.is_empty() {
            self.raise(BannerKind::Error, "Task title cannot be empty");
            return false;
        }

        let Some(task) = self.find(buffer.id) else {
            self.editing = None;
            self.raise(BannerKind::Error, missing_message(buffer.id));
            return false;
        };

        let payload = TaskPayload::new(title, task.is_done);
        match self.api.update_task(buffer.id, &payload).await {
            Ok(updated) => {
                self.replace(updated);
                self.editing = None;
                self.raise(BannerKind::Success, "Task updated successfully!");
                true
            }
            Err(e) => {
                self.fail("update task", &e);
                false
            }
        }
    }

    /// Routes a key press to the inline editor
    ///
    /// Returns `true` if the key was consumed.
    pub async fn handle_key(&mut self, key: Key) -> bool {
        if self.editing.is_none() {
            return false;
        }

        match key {
            Key::Enter => {
                self.commit_edit().await;
                true
            }
            Key::Escape => {
                self.cancel_edit();
                true
            }
            Key::Other => false,
        }
    }

    /// Deletes a task
    pub async fn delete(&mut self, id: i64) -> bool {
        match self.api.delete_task(id).await {
            Ok(()) => {
                self.tasks.retain(|task| task.id != id);
                if self.editing.as_ref().is_some_and(|buffer| buffer.id == id) {
                    self.editing = None;
                }
                self.raise(BannerKind::Success, "Task deleted successfully!");
                true
            }
            Err(e) => {
                self.fail("delete task", &e);
                false
            }
        }
    }

    /// Total and completed task counts
    pub fn summary(&self) -> Summary {
        Summary {
            total: self.tasks.len(),
            completed: self.tasks.iter().filter(|task| task.is_done).count(),
        }
    }

    /// Banner to display at `now`, if one is raised and not yet expired
    pub fn visible_banner(&self, now: Instant) -> Option<&Banner> {
        self.banner.as_ref().filter(|banner| !banner.is_expired(now))
    }

    /// Banner to display right now
    pub fn banner(&self) -> Option<&Banner> {
        self.visible_banner(Instant::now())
    }

    /// Clears the current banner
    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    fn find(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn replace(&mut self, updated: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == updated.id) {
            *slot = updated;
        }
    }

    fn raise(&mut self, kind: BannerKind, message: impl Into<String>) {
        self.banner = Some(Banner::new(kind, message));
    }

    fn fail(&mut self, action: &str, error: &ClientError) {
        warn!(action, error = %error, "Task action failed");
        self.raise(BannerKind::Error, error_message(action, error));
    }
}

fn missing_message(id: i64) -> String {
    format!("Task {} no longer exists.", id)
}

/// Banner text for a failed action
fn error_message(action: &str, error: &ClientError) -> String {
    match error {
        ClientError::Validation(details) if !details.is_empty() => details
            .iter()
            .map(|detail| detail.message.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        ClientError::NotFound(_) => "That task no longer exists.".to_string(),
        _ => format!("Failed to {}. Please try again.", action),
    }
}
