//! Route definitions for the `/accounts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Routes mounted at `/accounts`.
///
/// ```text
/// GET    /{id}                           -> get_account
/// GET    /{id}/ledger                    -> ledger_history  (?limit=)
/// POST   /{id}/purchases                 -> purchase_item
/// POST   /{id}/tasks/{task_id}/claim     -> claim_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(accounts::get_account))
        .route("/{id}/ledger", get(accounts::ledger_history))
        .route("/{id}/purchases", post(accounts::purchase_item))
        .route("/{id}/tasks/{task_id}/claim", post(accounts::claim_task))
}
