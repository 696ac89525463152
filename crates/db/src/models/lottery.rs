//! Lotteries and tickets.

use rewards_core::types::{Amount, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lotteries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lottery {
    pub id: DbId,
    pub title: String,
    pub ticket_price: Amount,
    pub pool: Amount,
    pub active: bool,
    pub winner_id: Option<DbId>,
    pub drawn_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for opening a lottery.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLottery {
    pub title: String,
    pub ticket_price: Amount,
}

/// A row from the `lottery_tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LotteryTicket {
    pub id: DbId,
    pub lottery_id: DbId,
    pub subject_id: DbId,
    pub purchased_at: Timestamp,
}
