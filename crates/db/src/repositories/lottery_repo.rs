//! Repositories for the `lotteries` and `lottery_tickets` tables.

use rewards_core::types::{Amount, DbId};
use sqlx::PgExecutor;

use crate::models::lottery::{CreateLottery, Lottery, LotteryTicket};

// ---------------------------------------------------------------------------
// LotteryRepo
// ---------------------------------------------------------------------------

/// Column list for `lotteries` queries.
const LOTTERY_COLUMNS: &str =
    "id, title, ticket_price, pool, active, winner_id, drawn_at, created_at";

/// Provides pool and lifecycle operations on lotteries.
pub struct LotteryRepo;

impl LotteryRepo {
    /// Open a new lottery with an empty pool.
    pub async fn create<'e, E>(executor: E, input: &CreateLottery) -> Result<Lottery, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO lotteries (title, ticket_price) VALUES ($1, $2) \
             RETURNING {LOTTERY_COLUMNS}"
        );
        sqlx::query_as::<_, Lottery>(&query)
            .bind(&input.title)
            .bind(input.ticket_price)
            .fetch_one(executor)
            .await
    }

    /// Find a lottery by its primary key.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Lottery>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {LOTTERY_COLUMNS} FROM lotteries WHERE id = $1");
        sqlx::query_as::<_, Lottery>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a lottery and lock its row for the rest of the transaction.
    pub async fn find_for_update<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Lottery>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {LOTTERY_COLUMNS} FROM lotteries WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Lottery>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Add a ticket sale to the pool of an active lottery.
    pub async fn add_to_pool<'e, E>(
        executor: E,
        id: DbId,
        amount: Amount,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("UPDATE lotteries SET pool = pool + $2 WHERE id = $1 AND active = true")
                .bind(id)
                .bind(amount)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate the lottery and record its winner (if any).
    ///
    /// Only an active lottery transitions; returns `false` otherwise.
    pub async fn close<'e, E>(
        executor: E,
        id: DbId,
        winner_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE lotteries SET active = false, winner_id = $2, drawn_at = NOW() \
             WHERE id = $1 AND active = true",
        )
        .bind(id)
        .bind(winner_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// LotteryTicketRepo
// ---------------------------------------------------------------------------

/// Column list for `lottery_tickets` queries.
const TICKET_COLUMNS: &str = "id, lottery_id, subject_id, purchased_at";

/// Provides ticket operations.
pub struct LotteryTicketRepo;

impl LotteryTicketRepo {
    /// Insert a ticket, returning the created row.
    pub async fn insert<'e, E>(
        executor: E,
        lottery_id: DbId,
        subject_id: DbId,
    ) -> Result<LotteryTicket, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO lottery_tickets (lottery_id, subject_id) VALUES ($1, $2) \
             RETURNING {TICKET_COLUMNS}"
        );
        sqlx::query_as::<_, LotteryTicket>(&query)
            .bind(lottery_id)
            .bind(subject_id)
            .fetch_one(executor)
            .await
    }

    /// The holder of every ticket sold for a lottery, one entry per ticket.
    pub async fn list_holders<'e, E>(
        executor: E,
        lottery_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "SELECT subject_id FROM lottery_tickets WHERE lottery_id = $1 ORDER BY id",
        )
        .bind(lottery_id)
        .fetch_all(executor)
        .await
    }
}
