use crate::types::{Amount, DbId};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Insufficient funds for account {subject_id}: required {required}, available {available}")]
    InsufficientFunds {
        subject_id: DbId,
        required: Amount,
        available: Amount,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
