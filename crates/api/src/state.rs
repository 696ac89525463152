use std::sync::Arc;

use rewards_economy::Economy;
use rewards_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, for reads outside any lease.
    pub pool: rewards_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Economic event processors for this instance.
    pub economy: Economy,
    /// Bus the processors publish committed events on.
    pub event_bus: Arc<EventBus>,
}
