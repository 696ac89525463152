//! Repository for the `locks` table.
//!
//! All expiry comparisons use the store clock (`NOW()`), so instances with
//! skewed local clocks still agree on whether a lease is live.

use std::time::Duration;

use sqlx::PgExecutor;

use crate::models::lock::{AcquiredLock, Lock};

/// Column list for `locks` queries.
const COLUMNS: &str = "lock_key, holder_id, acquired_at, expires_at";

/// Provides lease operations on named locks.
pub struct LockRepo;

impl LockRepo {
    /// Attempt to take the lease on `key` for `holder_id`.
    ///
    /// A single conditional upsert: inserts when no row exists, overwrites
    /// the row only when its lease has already expired, and otherwise does
    /// nothing. Returns `None` when a live lease is held by anyone.
    pub async fn try_acquire<'e, E>(
        executor: E,
        key: &str,
        holder_id: &str,
        ttl: Duration,
    ) -> Result<Option<AcquiredLock>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO locks (lock_key, holder_id, acquired_at, expires_at) \
             VALUES ($1, $2, NOW(), NOW() + make_interval(secs => $3)) \
             ON CONFLICT (lock_key) DO UPDATE \
                 SET holder_id = EXCLUDED.holder_id, \
                     acquired_at = EXCLUDED.acquired_at, \
                     expires_at = EXCLUDED.expires_at \
                 WHERE locks.expires_at <= NOW() \
             RETURNING {COLUMNS}, NOT (xmax = 0) AS reclaimed"
        );
        sqlx::query_as::<_, AcquiredLock>(&query)
            .bind(key)
            .bind(holder_id)
            .bind(ttl.as_secs_f64())
            .fetch_optional(executor)
            .await
    }

    /// Release a lease. Only the holder (matching `holder_id`) can release.
    ///
    /// Returns `true` if the row was deleted, `false` if the caller no
    /// longer holds it (it was never taken, or was reclaimed after expiry).
    pub async fn release<'e, E>(
        executor: E,
        key: &str,
        holder_id: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM locks WHERE lock_key = $1 AND holder_id = $2")
            .bind(key)
            .bind(holder_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Push a live lease's expiry to `NOW() + ttl`. Only the holder can extend.
    ///
    /// Returns the updated lease, or `None` if the caller's lease has
    /// already expired or been reclaimed.
    pub async fn extend<'e, E>(
        executor: E,
        key: &str,
        holder_id: &str,
        ttl: Duration,
    ) -> Result<Option<Lock>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE locks SET expires_at = NOW() + make_interval(secs => $3) \
             WHERE lock_key = $1 AND holder_id = $2 AND expires_at > NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lock>(&query)
            .bind(key)
            .bind(holder_id)
            .bind(ttl.as_secs_f64())
            .fetch_optional(executor)
            .await
    }

    /// Get the live lease on `key`, or `None` if the key is free or expired.
    pub async fn get_live<'e, E>(executor: E, key: &str) -> Result<Option<Lock>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query =
            format!("SELECT {COLUMNS} FROM locks WHERE lock_key = $1 AND expires_at > NOW()");
        sqlx::query_as::<_, Lock>(&query)
            .bind(key)
            .fetch_optional(executor)
            .await
    }

    /// Number of leases that have not yet expired.
    pub async fn count_live<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM locks WHERE expires_at > NOW()")
            .fetch_one(executor)
            .await
    }

    /// Delete all expired leases. Returns the number of rows removed.
    pub async fn cleanup_expired<'e, E>(executor: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM locks WHERE expires_at <= NOW()")
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
