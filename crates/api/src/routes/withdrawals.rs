//! Route definitions for the `/withdrawals` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::withdrawals;
use crate::state::AppState;

/// Routes mounted at `/withdrawals`.
///
/// ```text
/// POST   /                -> request_withdrawal
/// POST   /{id}/approve    -> approve
/// POST   /{id}/reject     -> reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(withdrawals::request_withdrawal))
        .route("/{id}/approve", post(withdrawals::approve))
        .route("/{id}/reject", post(withdrawals::reject))
}
