//! Lease rows for the mutation coordinator.

use rewards_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `locks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lock {
    pub lock_key: String,
    pub holder_id: String,
    pub acquired_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Result of a successful conditional acquire.
#[derive(Debug, Clone, FromRow)]
pub struct AcquiredLock {
    #[sqlx(flatten)]
    pub lock: Lock,
    /// `true` when an expired lease held by someone else was overwritten.
    pub reclaimed: bool,
}
