//! # Task Manager API Server Library
//!
//! This library provides the core functionality for the Task Manager API server.
//!
//! ## Modules
//!
//! - `app`: Application state, store initialisation and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request extractors (JSON body, path ids, caller context)
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
