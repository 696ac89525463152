use rewards_coordinator::CoordinatorError;
use rewards_core::error::CoreError;

/// Error returned by every economic event processor.
///
/// Returned unchanged from a rolled-back unit of work. A duplicate trigger
/// is never an error; see the `Already*` variants of each outcome.
#[derive(Debug, thiserror::Error)]
pub enum EconomyError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An external check (e.g. channel subscription) refused the claim.
    #[error("Verification failed: {0}")]
    Verification(String),
}

impl EconomyError {
    pub(crate) fn not_found(entity: &'static str, id: rewards_core::types::DbId) -> Self {
        EconomyError::Core(CoreError::NotFound { entity, id })
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        EconomyError::Core(CoreError::Validation(msg.into()))
    }
}
