//! Lottery ticket sales and single-payout draws.

mod common;

use assert_matches::assert_matches;
use rewards_coordinator::CoordinatorError;
use rewards_core::error::CoreError;
use rewards_core::ledger::EventType;
use rewards_db::repositories::{LedgerRepo, LotteryRepo};
use rewards_economy::{DrawOutcome, EconomyError};
use rust_decimal_macros::dec;
use sqlx::PgPool;

use common::{account, balance, economy, instance, lottery};

// ---------------------------------------------------------------------------
// Test: tickets grow the pool, the draw pays it once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_draw_pays_pool_once(pool: PgPool) {
    account(&pool, 1, None, dec!(10.00)).await;
    account(&pool, 2, None, dec!(10.00)).await;
    let lottery_id = lottery(&pool, dec!(2.00)).await;
    let economy = economy(&pool);

    economy.buy_lottery_ticket(lottery_id, 1).await.unwrap();
    economy.buy_lottery_ticket(lottery_id, 1).await.unwrap();
    let last = economy.buy_lottery_ticket(lottery_id, 2).await.unwrap();
    assert_eq!(last.pool, dec!(6.00));
    assert_eq!(balance(&pool, 1).await, dec!(6.00));
    assert_eq!(balance(&pool, 2).await, dec!(8.00));

    let outcome = economy.draw_lottery(lottery_id).await.unwrap();
    let DrawOutcome::Drawn { winner_id, prize, .. } = outcome else {
        panic!("expected a winner, got {outcome:?}");
    };
    assert_eq!(prize, dec!(6.00));
    assert!(winner_id == 1 || winner_id == 2);
    let expected = if winner_id == 1 { dec!(12.00) } else { dec!(14.00) };
    assert_eq!(balance(&pool, winner_id).await, expected);

    assert_eq!(
        economy.draw_lottery(lottery_id).await.unwrap(),
        DrawOutcome::AlreadyDrawn {
            lottery_id,
            winner_id: Some(winner_id),
        }
    );
    assert_eq!(balance(&pool, winner_id).await, expected);

    let closed = LotteryRepo::find_by_id(&pool, lottery_id).await.unwrap().unwrap();
    assert!(!closed.active);
    assert_eq!(closed.winner_id, Some(winner_id));
    assert!(closed.drawn_at.is_some());
}

// ---------------------------------------------------------------------------
// Test: concurrent draws from two instances pay once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_draws_pay_once(pool: PgPool) {
    account(&pool, 1, None, dec!(5.00)).await;
    let lottery_id = lottery(&pool, dec!(5.00)).await;
    let (a, _) = instance(&pool, "instance-a");
    let (b, _) = instance(&pool, "instance-b");
    a.buy_lottery_ticket(lottery_id, 1).await.unwrap();

    let (ra, rb) = tokio::join!(a.draw_lottery(lottery_id), b.draw_lottery(lottery_id));

    let drawn = [&ra, &rb]
        .iter()
        .filter(|r| matches!(r, Ok(DrawOutcome::Drawn { .. })))
        .count();
    assert_eq!(drawn, 1);
    for result in [&ra, &rb] {
        assert!(matches!(
            result,
            Ok(DrawOutcome::Drawn { .. })
                | Ok(DrawOutcome::AlreadyDrawn { .. })
                | Err(EconomyError::Coordinator(CoordinatorError::LockUnavailable { .. }))
        ));
    }

    assert_eq!(balance(&pool, 1).await, dec!(5.00));
    assert_eq!(
        LedgerRepo::count_by_reference(&pool, EventType::LotteryPayout, &lottery_id.to_string())
            .await
            .unwrap(),
        1
    );
}

// ---------------------------------------------------------------------------
// Test: no tickets closes the lottery without a winner
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_draw_without_tickets(pool: PgPool) {
    let lottery_id = lottery(&pool, dec!(1.00)).await;
    let economy = economy(&pool);

    assert_eq!(
        economy.draw_lottery(lottery_id).await.unwrap(),
        DrawOutcome::NoParticipants { lottery_id }
    );
    assert_eq!(
        economy.draw_lottery(lottery_id).await.unwrap(),
        DrawOutcome::AlreadyDrawn {
            lottery_id,
            winner_id: None,
        }
    );
}

// ---------------------------------------------------------------------------
// Test: closed lotteries and poor subjects cannot buy tickets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ticket_refusals(pool: PgPool) {
    account(&pool, 1, None, dec!(1.00)).await;
    let lottery_id = lottery(&pool, dec!(2.00)).await;
    let economy = economy(&pool);

    assert_matches!(
        economy.buy_lottery_ticket(lottery_id, 1).await,
        Err(EconomyError::Core(CoreError::InsufficientFunds { .. }))
    );
    let unchanged = LotteryRepo::find_by_id(&pool, lottery_id).await.unwrap().unwrap();
    assert_eq!(unchanged.pool, dec!(0));

    economy.draw_lottery(lottery_id).await.unwrap();
    assert_matches!(
        economy.buy_lottery_ticket(lottery_id, 1).await,
        Err(EconomyError::Core(CoreError::Conflict(_)))
    );
    assert_matches!(
        economy.draw_lottery(404).await,
        Err(EconomyError::Core(CoreError::NotFound { entity: "lottery", .. }))
    );
}
