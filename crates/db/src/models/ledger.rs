//! Ledger entries.

use rewards_core::types::{Amount, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `ledger` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LedgerEntry {
    pub id: DbId,
    pub subject_id: DbId,
    pub event_type: String,
    pub amount: Amount,
    pub reference: String,
    pub created_at: Timestamp,
}
