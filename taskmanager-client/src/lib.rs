//! # Task Manager Client Library
//!
//! This library provides a typed HTTP client for the Task Manager API and a
//! view model that keeps a local task list in step with the server.
//!
//! ## Modules
//!
//! - `api`: `TaskApi` trait, reqwest-backed `HttpClient`, `ClientError`
//! - `view`: `TaskView` with optimistic merge, inline editing and banners
//!
//! ## Example
//!
//! ```no_run
//! use taskmanager_client::{api::HttpClient, view::TaskView};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut view = TaskView::new(HttpClient::new("http://127.0.0.1:8080")?);
//! view.load().await;
//! view.create("Buy milk").await;
//! println!("{} tasks", view.summary().total);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod view;
