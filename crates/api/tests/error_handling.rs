//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use rewards_api::error::AppError;
use rewards_coordinator::CoordinatorError;
use rewards_core::error::CoreError;
use rewards_economy::EconomyError;
use rust_decimal_macros::dec;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "account",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "account with id 42 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Validation("amount must be positive".into())))
            .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "amount must be positive");
}

#[tokio::test]
async fn insufficient_funds_returns_422() {
    let err = AppError::Core(CoreError::InsufficientFunds {
        subject_id: 7,
        required: dec!(8.00),
        available: dec!(2.00),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INSUFFICIENT_FUNDS");
}

#[tokio::test]
async fn lock_unavailable_returns_409() {
    let err = AppError::Coordinator(CoordinatorError::LockUnavailable {
        key: "purchase:1:2".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "LOCK_UNAVAILABLE");
    assert!(json["error"].as_str().unwrap().contains("purchase:1:2"));
}

#[tokio::test]
async fn lock_timeout_returns_503() {
    let err = AppError::Coordinator(CoordinatorError::Timeout {
        key: "profile:1".into(),
        budget_ms: 8000,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "LOCK_TIMEOUT");
}

#[tokio::test]
async fn economy_errors_flatten_into_app_errors() {
    let (status, json) = error_to_response(AppError::from(EconomyError::Verification(
        "not subscribed".into(),
    )))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "VERIFICATION_FAILED");

    let (status, json) = error_to_response(AppError::from(EconomyError::Coordinator(
        CoordinatorError::LockUnavailable {
            key: "withdrawal:3".into(),
        },
    )))
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "LOCK_UNAVAILABLE");
}

#[tokio::test]
async fn database_error_is_sanitized() {
    let (status, json) =
        error_to_response(AppError::Database(sqlx::Error::PoolTimedOut)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, _) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contention_responses_carry_retry_after() {
    let response = AppError::Coordinator(CoordinatorError::LockUnavailable {
        key: "profile:1".into(),
    })
    .into_response();
    assert_eq!(response.headers().get("retry-after").unwrap(), "1");

    let response = AppError::Coordinator(CoordinatorError::Timeout {
        key: "profile:1".into(),
        budget_ms: 8000,
    })
    .into_response();
    assert_eq!(response.headers().get("retry-after").unwrap(), "1");

    let response = AppError::Core(CoreError::Conflict("closed".into())).into_response();
    assert!(response.headers().get("retry-after").is_none());
}

#[tokio::test]
async fn invalid_ledger_reference_returns_400() {
    let err = AppError::Coordinator(CoordinatorError::InvalidReference(
        "Ledger reference must not be empty".into(),
    ));
    assert!(!err.is_retryable());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Ledger reference must not be empty");
}
