//! Withdrawal requests.

use rewards_core::types::{Amount, DbId, Timestamp};
use rewards_core::withdrawal::WithdrawalStatus;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `withdrawal_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WithdrawalRequest {
    pub id: DbId,
    pub subject_id: DbId,
    pub amount: Amount,
    pub status: String,
    pub requested_at: Timestamp,
    pub processed_at: Option<Timestamp>,
}

impl WithdrawalRequest {
    /// Parse the stored status. The table's CHECK constraint keeps it valid.
    pub fn status(&self) -> Result<WithdrawalStatus, String> {
        self.status.parse()
    }
}
