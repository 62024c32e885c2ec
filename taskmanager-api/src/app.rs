/// Application state and router builder
///
/// This module defines the shared application state, prepares the store
/// (pool, migrations, default owner), and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskmanager_api::{app, config::Config};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = app::init_state(config).await?;
/// let router = app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, put},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use taskmanager_shared::db::{migrations, pool, seed};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Opens the store described by `config` and makes it ready to serve
///
/// 1. Creates the connection pool
/// 2. Applies pending migrations
/// 3. Seeds the default task owner if missing
pub async fn init_state(config: Config) -> anyhow::Result<AppState> {
    let db = pool::create_pool(config.pool_config()).await?;
    migrations::run_migrations(&db).await?;

    let owner_ready =
        seed::ensure_default_owner(&db, config.owner.default_id, &config.owner.default_email)
            .await?;
    info!(
        default_owner_id = config.owner.default_id,
        owner_ready, "Store initialised"
    );

    Ok(AppState::new(db, config))
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET    /health
/// ├── GET    /tasks          # List tasks
/// ├── POST   /tasks          # Create task
/// ├── PUT    /tasks/:id      # Replace task
/// ├── DELETE /tasks/:id      # Delete task
/// ├── GET    /users          # List users with tasks
/// ├── POST   /users          # Create user
/// ├── GET    /users/:id      # Get user with tasks
/// ├── PUT    /users/:id      # Replace user
/// └── DELETE /users/:id      # Delete user and their tasks
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::LOCATION])
        .max_age(std::time::Duration::from_secs(3600))
}
