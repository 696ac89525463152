/// Failures of the coordination machinery itself.
///
/// Errors raised by a unit of work are returned to the caller unchanged;
/// the unit of work's error type only needs `From<CoordinatorError>`.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// Another live holder owns the key. Callers decide whether to surface
    /// "try again" or to drop the request (e.g. a retried webhook).
    #[error("Lock unavailable: {key} is held by another instance")]
    LockUnavailable { key: String },

    /// The unit of work ran past its budget; its transaction was rolled back.
    #[error("Unit of work under {key} exceeded its {budget_ms} ms budget")]
    Timeout { key: String, budget_ms: u64 },

    /// The lock key is empty or too long.
    #[error("Invalid lock key: {0}")]
    InvalidKey(String),

    /// The ledger reference is empty or too long.
    #[error("Invalid ledger reference: {0}")]
    InvalidReference(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CoordinatorError {
    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoordinatorError::LockUnavailable { .. } | CoordinatorError::Timeout { .. }
        )
    }
}
