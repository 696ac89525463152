use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use rewards_coordinator::CoordinatorError;
use rewards_core::error::CoreError;
use rewards_economy::EconomyError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent `{ "error", "code" }`
/// JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Lease contention, an overrun unit of work, or a malformed key.
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Seconds a client should wait before retrying a contended or overrun
/// unit of work.
const RETRY_AFTER_SECS: &str = "1";

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<EconomyError> for AppError {
    fn from(err: EconomyError) -> Self {
        match err {
            EconomyError::Core(e) => AppError::Core(e),
            EconomyError::Coordinator(e) => AppError::Coordinator(e),
            EconomyError::Database(e) => AppError::Database(e),
            EconomyError::Verification(msg) => AppError::Verification(msg),
        }
    }
}

impl AppError {
    /// Whether the same request may succeed if simply sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Coordinator(err) if err.is_retryable())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::InsufficientFunds { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INSUFFICIENT_FUNDS",
                    core.to_string(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Coordination errors ---
            AppError::Coordinator(err) => match err {
                CoordinatorError::LockUnavailable { key } => (
                    StatusCode::CONFLICT,
                    "LOCK_UNAVAILABLE",
                    format!("{key} is being processed by another request, try again"),
                ),
                CoordinatorError::Timeout { .. } => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "LOCK_TIMEOUT",
                    err.to_string(),
                ),
                CoordinatorError::InvalidKey(msg) | CoordinatorError::InvalidReference(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoordinatorError::Database(db) => classify_sqlx_error(db),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::Verification(msg) => {
                (StatusCode::FORBIDDEN, "VERIFICATION_FAILED", msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        let mut response = (status, axum::Json(body)).into_response();
        if self.is_retryable() {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
        }
        response
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on `uq_*` constraints map to 409. For the ledger's
///   single-shot index this means a duplicate got past the lease and was
///   rolled back.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some(rewards_db::UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
