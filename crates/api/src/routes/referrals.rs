//! Route definitions for the `/referrals` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::referrals;
use crate::state::AppState;

/// Routes mounted at `/referrals`.
///
/// ```text
/// POST   /credit    -> credit_referral
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/credit", post(referrals::credit_referral))
}
