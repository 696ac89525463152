//! Route definitions for the `/lotteries` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::lotteries;
use crate::state::AppState;

/// Routes mounted at `/lotteries`.
///
/// ```text
/// POST   /{id}/tickets    -> buy_ticket
/// POST   /{id}/draw       -> draw
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/tickets", post(lotteries::buy_ticket))
        .route("/{id}/draw", post(lotteries::draw))
}
