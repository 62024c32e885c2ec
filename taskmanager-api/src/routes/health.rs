/// Health check endpoint
///
/// Provides a simple health check endpoint that verifies:
/// - The server is running
/// - Database connectivity
/// - The schema version that has been applied
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "schemaVersion": 20250101000000,
///   "pool": { "activeConnections": 1, "idleConnections": 0, "totalConnections": 1 }
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskmanager_shared::db::{
    migrations,
    pool::{self, PoolStats},
};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Latest applied migration, if the database is reachable
    pub schema_version: Option<i64>,

    /// Connection pool usage
    pub pool: PoolStats,
}

/// Health check handler
///
/// Always answers 200; a broken database is reported as `degraded`.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = pool::health_check(&state.db).await.is_ok();

    let schema_version = if connected {
        migrations::get_migration_status(&state.db)
            .await
            .ok()
            .and_then(|status| status.latest_version)
    } else {
        None
    };

    Ok(Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        schema_version,
        pool: pool::get_pool_stats(&state.db),
    }))
}
