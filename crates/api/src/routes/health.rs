use axum::extract::State;
use axum::{routing::get, Json, Router};
use rewards_db::repositories::LockRepo;
use serde::Serialize;

use crate::state::AppState;

/// Liveness plus a snapshot of the lease table.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answered, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Instance id this process takes leases under.
    pub instance_id: String,
    /// Unexpired leases across all instances. Absent when the database is down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_locks: Option<i64>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let live_locks = match LockRepo::count_live(&state.pool).await {
        Ok(count) => Some(count),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not read the lock table");
            None
        }
    };
    let db_healthy = live_locks.is_some();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        instance_id: state.economy.coordinator().locks().instance_id().to_string(),
        live_locks,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
