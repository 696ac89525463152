//! Idempotency witness for economic events.
//!
//! `has_event` and `record_event` take the connection of an open
//! transaction: the check and the record must commit together with the
//! balance change they witness, under the coordinator's lease for the same
//! event. Calling them on separate connections reintroduces the race the
//! lease exists to prevent.

use sqlx::PgConnection;

use rewards_core::ledger::{validate_reference, EventType};
use rewards_core::types::{Amount, DbId};
use rewards_db::models::ledger::LedgerEntry;
use rewards_db::repositories::LedgerRepo;
use rewards_db::DbPool;

use crate::error::CoordinatorError;

/// Maximum entries returned by [`Ledger::history`].
pub const MAX_HISTORY_LIMIT: i64 = 500;

pub struct Ledger;

impl Ledger {
    /// Whether the exact `(subject_id, event_type, reference)` event was recorded.
    pub async fn has_event(
        conn: &mut PgConnection,
        subject_id: DbId,
        event_type: EventType,
        reference: &str,
    ) -> Result<bool, sqlx::Error> {
        LedgerRepo::exists(conn, subject_id, event_type, reference).await
    }

    /// Append an entry.
    ///
    /// For single-shot event types a second record of the same triple fails
    /// with a unique violation, which rolls back the surrounding transaction.
    /// A malformed reference is rejected before touching the store.
    pub async fn record_event(
        conn: &mut PgConnection,
        subject_id: DbId,
        event_type: EventType,
        amount: Amount,
        reference: &str,
    ) -> Result<LedgerEntry, CoordinatorError> {
        validate_reference(reference).map_err(CoordinatorError::InvalidReference)?;
        let entry = LedgerRepo::insert(conn, subject_id, event_type, amount, reference).await?;
        tracing::debug!(
            subject_id,
            event_type = %event_type,
            reference,
            amount = %amount,
            "Ledger event recorded"
        );
        Ok(entry)
    }

    /// A subject's entries, newest first. Read-only, outside any lease.
    pub async fn history(
        pool: &DbPool,
        subject_id: DbId,
        limit: i64,
    ) -> Result<Vec<LedgerEntry>, sqlx::Error> {
        LedgerRepo::list_by_subject(pool, subject_id, limit.clamp(1, MAX_HISTORY_LIMIT)).await
    }
}
