//! # Task Manager Shared Library
//!
//! This crate contains the data model shared by the API server and the client.
//!
//! ## Module Organization
//!
//! - `models`: User and Task representations, request payloads, and (with the
//!   `db` feature) their CRUD operations
//! - `db`: SQLite connection pool, migrations, and default-owner seeding
//!   (`db` feature only)
//!
//! The client builds this crate with `default-features = false` so that it only
//! pulls in the wire types.

#[cfg(feature = "db")]
pub mod db;
pub mod models;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
