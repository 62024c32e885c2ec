//! # Task Manager API Server
//!
//! REST service for users and their tasks, backed by SQLite.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Task endpoints (list, create, replace, delete)
//! - User endpoints (list and get with tasks, create, replace, delete)
//! - A health endpoint reporting database and schema status
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=sqlite://tasks.db cargo run -p taskmanager-api
//! ```

use taskmanager_api::{app, config::Config};
use taskmanager_shared::db::pool;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskmanager_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Task Manager API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let bind_address = config.bind_address();

    let state = app::init_state(config).await?;
    let db = state.db.clone();
    let router = app::build_router(state);

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
