//! Lottery ticket sales and the draw.
//!
//! Both take the `lottery-draw:{id}` lease, so the participant set cannot
//! change between reading the tickets and picking the winner. The lottery's
//! `active` flag is the idempotency witness for the payout: it is cleared in
//! the same transaction that pays the pool.

use rewards_coordinator::Ledger;
use rewards_core::error::CoreError;
use rewards_core::ledger::{reference, EventType};
use rewards_core::lock_keys;
use rewards_core::lottery::pick_winner;
use rewards_core::types::{Amount, DbId};
use rewards_db::repositories::{AccountRepo, LotteryRepo, LotteryTicketRepo};
use rewards_events::bus::kinds;
use rewards_events::EconomicEvent;
use serde::Serialize;
use sqlx::PgConnection;

use crate::{Economy, EconomyError};

/// A ticket sold into an active lottery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketPurchase {
    pub ticket_id: DbId,
    pub lottery_id: DbId,
    pub subject_id: DbId,
    pub price: Amount,
    pub pool: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DrawOutcome {
    Drawn {
        lottery_id: DbId,
        winner_id: DbId,
        prize: Amount,
    },
    /// Closed without a winner because no ticket was sold.
    NoParticipants { lottery_id: DbId },
    /// The lottery was drawn by an earlier call.
    AlreadyDrawn {
        lottery_id: DbId,
        winner_id: Option<DbId>,
    },
}

impl Economy {
    /// Sell one ticket: debit the price, grow the pool, record the ticket.
    pub async fn buy_lottery_ticket(
        &self,
        lottery_id: DbId,
        subject_id: DbId,
    ) -> Result<TicketPurchase, EconomyError> {
        let purchase = self
            .coordinator
            .transactional_with_lock(&lock_keys::lottery_draw(lottery_id), move |conn| {
                Box::pin(buy_ticket_tx(conn, lottery_id, subject_id))
            })
            .await?;

        tracing::info!(
            lottery_id,
            subject_id,
            ticket_id = purchase.ticket_id,
            pool = %purchase.pool,
            "Lottery ticket sold"
        );
        self.notify(
            EconomicEvent::new(kinds::LOTTERY_TICKET_PURCHASED, subject_id).with_payload(
                serde_json::json!({
                    "lottery_id": lottery_id,
                    "ticket_id": purchase.ticket_id,
                    "price": purchase.price,
                }),
            ),
        );

        Ok(purchase)
    }

    /// Draw the lottery: pick a ticket uniformly, pay its holder the whole
    /// pool, close the lottery. A second draw is a no-op.
    pub async fn draw_lottery(&self, lottery_id: DbId) -> Result<DrawOutcome, EconomyError> {
        let outcome = self
            .coordinator
            .transactional_with_lock(&lock_keys::lottery_draw(lottery_id), move |conn| {
                Box::pin(draw_tx(conn, lottery_id))
            })
            .await?;

        match &outcome {
            DrawOutcome::Drawn {
                winner_id, prize, ..
            } => {
                tracing::info!(lottery_id, winner_id, prize = %prize, "Lottery drawn");
                self.notify(
                    EconomicEvent::new(kinds::LOTTERY_WON, *winner_id).with_payload(
                        serde_json::json!({ "lottery_id": lottery_id, "prize": prize }),
                    ),
                );
            }
            DrawOutcome::NoParticipants { .. } => {
                tracing::info!(lottery_id, "Lottery closed without participants");
            }
            DrawOutcome::AlreadyDrawn { .. } => {
                tracing::debug!(lottery_id, "Lottery already drawn");
            }
        }

        Ok(outcome)
    }
}

async fn buy_ticket_tx(
    conn: &mut PgConnection,
    lottery_id: DbId,
    subject_id: DbId,
) -> Result<TicketPurchase, EconomyError> {
    let lottery = LotteryRepo::find_for_update(&mut *conn, lottery_id)
        .await?
        .ok_or_else(|| EconomyError::not_found("lottery", lottery_id))?;
    if !lottery.active {
        return Err(CoreError::Conflict(format!("Lottery {lottery_id} is closed")).into());
    }

    let account = AccountRepo::find_by_id(&mut *conn, subject_id)
        .await?
        .ok_or_else(|| EconomyError::not_found("account", subject_id))?;

    let price = lottery.ticket_price;
    if AccountRepo::debit_if_sufficient(&mut *conn, subject_id, price)
        .await?
        .is_none()
    {
        return Err(CoreError::InsufficientFunds {
            subject_id,
            required: price,
            available: account.balance,
        }
        .into());
    }

    LotteryRepo::add_to_pool(&mut *conn, lottery_id, price).await?;
    let ticket = LotteryTicketRepo::insert(&mut *conn, lottery_id, subject_id).await?;
    Ledger::record_event(
        &mut *conn,
        subject_id,
        EventType::LotteryTicket,
        price,
        &reference(ticket.id),
    )
    .await?;

    Ok(TicketPurchase {
        ticket_id: ticket.id,
        lottery_id,
        subject_id,
        price,
        pool: lottery.pool + price,
    })
}

async fn draw_tx(conn: &mut PgConnection, lottery_id: DbId) -> Result<DrawOutcome, EconomyError> {
    let lottery = LotteryRepo::find_for_update(&mut *conn, lottery_id)
        .await?
        .ok_or_else(|| EconomyError::not_found("lottery", lottery_id))?;
    if !lottery.active {
        return Ok(DrawOutcome::AlreadyDrawn {
            lottery_id,
            winner_id: lottery.winner_id,
        });
    }

    let holders = LotteryTicketRepo::list_holders(&mut *conn, lottery_id).await?;
    let winner = {
        let mut rng = rand::rng();
        pick_winner(&holders, &mut rng)
    };

    let Some(winner_id) = winner else {
        close(conn, lottery_id, None).await?;
        return Ok(DrawOutcome::NoParticipants { lottery_id });
    };

    let prize = lottery.pool;
    AccountRepo::credit(&mut *conn, winner_id, prize).await?;
    Ledger::record_event(
        &mut *conn,
        winner_id,
        EventType::LotteryPayout,
        prize,
        &reference(lottery_id),
    )
    .await?;
    close(conn, lottery_id, Some(winner_id)).await?;

    Ok(DrawOutcome::Drawn {
        lottery_id,
        winner_id,
        prize,
    })
}

async fn close(
    conn: &mut PgConnection,
    lottery_id: DbId,
    winner_id: Option<DbId>,
) -> Result<(), EconomyError> {
    if !LotteryRepo::close(conn, lottery_id, winner_id).await? {
        let reason = format!("Lottery {lottery_id} was closed concurrently");
        return Err(CoreError::Conflict(reason).into());
    }
    Ok(())
}
