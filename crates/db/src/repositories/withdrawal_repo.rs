//! Repository for the `withdrawal_requests` table.

use rewards_core::types::{Amount, DbId};
use rewards_core::withdrawal::WithdrawalStatus;
use sqlx::PgExecutor;

use crate::models::withdrawal::WithdrawalRequest;

/// Column list for `withdrawal_requests` queries.
const COLUMNS: &str = "id, subject_id, amount, status, requested_at, processed_at";

/// Provides the withdrawal request state machine's storage.
pub struct WithdrawalRepo;

impl WithdrawalRepo {
    /// Insert a new `pending` request, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        subject_id: DbId,
        amount: Amount,
    ) -> Result<WithdrawalRequest, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO withdrawal_requests (subject_id, amount) VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WithdrawalRequest>(&query)
            .bind(subject_id)
            .bind(amount)
            .fetch_one(executor)
            .await
    }

    /// Find a request by its primary key.
    pub async fn find_by_id<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<WithdrawalRequest>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM withdrawal_requests WHERE id = $1");
        sqlx::query_as::<_, WithdrawalRequest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a request and lock its row for the rest of the transaction.
    pub async fn find_for_update<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<WithdrawalRequest>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM withdrawal_requests WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, WithdrawalRequest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Move a `pending` request to a terminal status.
    ///
    /// Returns the updated row, or `None` if the request is not pending.
    pub async fn transition_from_pending<'e, E>(
        executor: E,
        id: DbId,
        status: WithdrawalStatus,
    ) -> Result<Option<WithdrawalRequest>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE withdrawal_requests SET status = $2, processed_at = NOW() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WithdrawalRequest>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(executor)
            .await
    }

    /// List pending requests, oldest first.
    pub async fn list_pending<'e, E>(
        executor: E,
        limit: i64,
    ) -> Result<Vec<WithdrawalRequest>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM withdrawal_requests WHERE status = 'pending' \
             ORDER BY requested_at ASC LIMIT $1"
        );
        sqlx::query_as::<_, WithdrawalRequest>(&query)
            .bind(limit)
            .fetch_all(executor)
            .await
    }
}
