pub mod accounts;
pub mod health;
pub mod lotteries;
pub mod referrals;
pub mod withdrawals;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /accounts/{id}                                   account balance and counters
/// /accounts/{id}/ledger                            ledger history (?limit=)
/// /accounts/{id}/purchases                         buy an item (POST)
/// /accounts/{id}/tasks/{task_id}/claim             claim a task reward (POST)
///
/// /referrals/credit                                credit a referral (POST)
///
/// /lotteries/{id}/tickets                          buy a ticket (POST)
/// /lotteries/{id}/draw                             draw the winner (POST)
///
/// /withdrawals                                     request a withdrawal (POST)
/// /withdrawals/{id}/approve                        approve (POST)
/// /withdrawals/{id}/reject                         reject and refund (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/accounts", accounts::router())
        .nest("/referrals", referrals::router())
        .nest("/lotteries", lotteries::router())
        .nest("/withdrawals", withdrawals::router())
}
