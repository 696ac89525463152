//! Repository for the `accounts` table.

use rewards_core::types::{Amount, DbId};
use sqlx::PgExecutor;

use crate::models::account::Account;

/// Column list for `accounts` queries.
const COLUMNS: &str = "id, referrer_id, balance, total_earned, referral_count, \
                       created_at, updated_at";

/// Provides balance and lifecycle operations on subject accounts.
pub struct AccountRepo;

impl AccountRepo {
    /// Create the account on first interaction.
    ///
    /// An existing account is returned unchanged; in particular its
    /// `referrer_id` is never overwritten.
    pub async fn ensure<'e, E>(
        executor: E,
        id: DbId,
        referrer_id: Option<DbId>,
    ) -> Result<Account, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let query = format!(
            "INSERT INTO accounts (id, referrer_id) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET id = accounts.id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(referrer_id)
            .fetch_one(executor)
            .await
    }

    /// Find an account by subject id.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Account>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Add `amount` to the balance and to `total_earned`.
    ///
    /// A pure additive delta: commutative, safe from any instance without a lock.
    /// Returns `false` if the account does not exist.
    pub async fn credit<'e, E>(executor: E, id: DbId, amount: Amount) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE accounts SET balance = balance + $2, total_earned = total_earned + $2, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(amount)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return previously held funds without counting them as earnings.
    pub async fn refund<'e, E>(executor: E, id: DbId, amount: Amount) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE accounts SET balance = balance + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(amount)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Subtract `amount` only if the balance covers it.
    ///
    /// Returns the balance after the debit, or `None` (and changes nothing)
    /// when funds are insufficient or the account does not exist.
    pub async fn debit_if_sufficient<'e, E>(
        executor: E,
        id: DbId,
        amount: Amount,
    ) -> Result<Option<Amount>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, Amount>(
            "UPDATE accounts SET balance = balance - $2, updated_at = NOW() \
             WHERE id = $1 AND balance >= $2 \
             RETURNING balance",
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(executor)
        .await
    }

    /// Increment the referral counter of a level-1 referrer.
    pub async fn increment_referral_count<'e, E>(executor: E, id: DbId) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "UPDATE accounts SET referral_count = referral_count + 1, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(())
    }
}
