//! Subject accounts.

use rewards_core::types::{Amount, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `accounts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: DbId,
    pub referrer_id: Option<DbId>,
    pub balance: Amount,
    pub total_earned: Amount,
    pub referral_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
