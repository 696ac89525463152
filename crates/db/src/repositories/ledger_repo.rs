//! Repository for the append-only `ledger` table.

use rewards_core::ledger::EventType;
use rewards_core::types::{Amount, DbId};
use sqlx::PgExecutor;

use crate::models::ledger::LedgerEntry;

/// Column list for `ledger` queries.
const COLUMNS: &str = "id, subject_id, event_type, amount, reference, created_at";

/// Name of the partial unique index backing single-shot events.
pub const SINGLE_SHOT_CONSTRAINT: &str = "uq_ledger_single_shot";

/// Provides append and lookup operations on ledger entries.
///
/// Entries are never updated or deleted.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Whether an entry exists for the exact `(subject_id, event_type, reference)` triple.
    pub async fn exists<'e, E>(
        executor: E,
        subject_id: DbId,
        event_type: EventType,
        reference: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM ledger \
             WHERE subject_id = $1 AND event_type = $2 AND reference = $3)",
        )
        .bind(subject_id)
        .bind(event_type.as_str())
        .bind(reference)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// Append one entry, returning the created row.
    ///
    /// A second single-shot entry for the same triple fails with a unique
    /// violation on [`SINGLE_SHOT_CONSTRAINT`].
    pub async fn insert<'e, E>(
        executor: E,
        subject_id: DbId,
        event_type: EventType,
        amount: Amount,
        reference: &str,
    ) -> Result<LedgerEntry, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO ledger (subject_id, event_type, amount, reference) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LedgerEntry>(&query)
            .bind(subject_id)
            .bind(event_type.as_str())
            .bind(amount)
            .bind(reference)
            .fetch_one(executor)
            .await
    }

    /// List a subject's entries, newest first.
    pub async fn list_by_subject<'e, E>(
        executor: E,
        subject_id: DbId,
        limit: i64,
    ) -> Result<Vec<LedgerEntry>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM ledger WHERE subject_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2"
        );
        sqlx::query_as::<_, LedgerEntry>(&query)
            .bind(subject_id)
            .bind(limit)
            .fetch_all(executor)
            .await
    }

    /// Count entries matching a reference across all subjects for one event type.
    pub async fn count_by_reference<'e, E>(
        executor: E,
        event_type: EventType,
        reference: &str,
    ) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM ledger WHERE event_type = $1 AND reference = $2")
                .bind(event_type.as_str())
                .bind(reference)
                .fetch_one(executor)
                .await?;
        Ok(row.0)
    }
}
