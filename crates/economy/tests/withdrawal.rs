//! Withdrawal requests and their terminal transitions.

mod common;

use assert_matches::assert_matches;
use rewards_core::error::CoreError;
use rewards_core::ledger::EventType;
use rewards_core::withdrawal::WithdrawalStatus;
use rewards_db::repositories::{LedgerRepo, WithdrawalRepo};
use rewards_economy::{EconomyError, WithdrawalOutcome};
use rust_decimal_macros::dec;
use sqlx::PgPool;

use common::{account, balance, economy, instance};

// ---------------------------------------------------------------------------
// Test: request holds funds, reject refunds exactly once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_refunds_once(pool: PgPool) {
    account(&pool, 1, None, dec!(10.00)).await;
    let economy = economy(&pool);

    let request = economy.request_withdrawal(1, dec!(4.00)).await.unwrap();
    assert_eq!(request.status, "pending");
    assert_eq!(balance(&pool, 1).await, dec!(6.00));

    assert_eq!(
        economy.reject_withdrawal(request.id).await.unwrap(),
        WithdrawalOutcome::Rejected {
            request_id: request.id,
            subject_id: 1,
            refunded: dec!(4.00),
        }
    );
    assert_eq!(balance(&pool, 1).await, dec!(10.00));

    assert_eq!(
        economy.reject_withdrawal(request.id).await.unwrap(),
        WithdrawalOutcome::AlreadyProcessed {
            request_id: request.id,
            status: WithdrawalStatus::Rejected,
        }
    );
    assert_matches!(
        economy.approve_withdrawal(request.id).await.unwrap(),
        WithdrawalOutcome::AlreadyProcessed { status: WithdrawalStatus::Rejected, .. }
    );
    assert_eq!(balance(&pool, 1).await, dec!(10.00));
}

// ---------------------------------------------------------------------------
// Test: approve changes no balance and is terminal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_is_terminal(pool: PgPool) {
    account(&pool, 1, None, dec!(10.00)).await;
    let economy = economy(&pool);
    let request = economy.request_withdrawal(1, dec!(10.00)).await.unwrap();

    assert_matches!(
        economy.approve_withdrawal(request.id).await.unwrap(),
        WithdrawalOutcome::Approved { amount, .. } if amount == dec!(10.00)
    );
    assert_eq!(balance(&pool, 1).await, dec!(0));

    assert_matches!(
        economy.reject_withdrawal(request.id).await.unwrap(),
        WithdrawalOutcome::AlreadyProcessed { status: WithdrawalStatus::Approved, .. }
    );
    assert_eq!(balance(&pool, 1).await, dec!(0));

    let stored = WithdrawalRepo::find_by_id(&pool, request.id).await.unwrap().unwrap();
    assert_eq!(stored.status().unwrap(), WithdrawalStatus::Approved);
    assert!(stored.processed_at.is_some());
}

// ---------------------------------------------------------------------------
// Test: concurrent rejects from two instances refund once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_rejects_refund_once(pool: PgPool) {
    account(&pool, 1, None, dec!(10.00)).await;
    let (a, _) = instance(&pool, "instance-a");
    let (b, _) = instance(&pool, "instance-b");
    let request = a.request_withdrawal(1, dec!(3.00)).await.unwrap();

    let (ra, rb) = tokio::join!(a.reject_withdrawal(request.id), b.reject_withdrawal(request.id));

    let rejected = [&ra, &rb]
        .iter()
        .filter(|r| matches!(r, Ok(WithdrawalOutcome::Rejected { .. })))
        .count();
    assert_eq!(rejected, 1);
    assert_eq!(balance(&pool, 1).await, dec!(10.00));
    assert_eq!(
        LedgerRepo::count_by_reference(&pool, EventType::WithdrawalRefund, &request.id.to_string())
            .await
            .unwrap(),
        1
    );
}

// ---------------------------------------------------------------------------
// Test: invalid requests hold nothing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_request_refusals(pool: PgPool) {
    account(&pool, 1, None, dec!(2.00)).await;
    let economy = economy(&pool);

    assert_matches!(
        economy.request_withdrawal(1, dec!(0.50)).await,
        Err(EconomyError::Core(CoreError::Validation(_)))
    );
    assert_matches!(
        economy.request_withdrawal(1, dec!(-1.00)).await,
        Err(EconomyError::Core(CoreError::Validation(_)))
    );
    assert_matches!(
        economy.request_withdrawal(1, dec!(5.00)).await,
        Err(EconomyError::Core(CoreError::InsufficientFunds { .. }))
    );
    assert!(WithdrawalRepo::list_pending(&pool, 10).await.unwrap().is_empty());
    assert_eq!(balance(&pool, 1).await, dec!(2.00));

    assert_matches!(
        economy.approve_withdrawal(404).await,
        Err(EconomyError::Core(CoreError::NotFound { .. }))
    );
}
