//! The mutation coordinator: lease + optional transaction around a unit of work.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;
use sqlx::{PgConnection, Postgres, Transaction};

use rewards_core::lock_keys::validate_lock_key;
use rewards_db::DbPool;

use crate::config::CoordinatorConfig;
use crate::error::CoordinatorError;
use crate::lock_manager::{LeaseGuard, LockManager};

/// Runs units of work with at most one concurrent executor per key across
/// every instance sharing the database.
///
/// Guarantees, for both entry points:
///
/// - If the lease cannot be taken, the work never starts and the caller gets
///   [`CoordinatorError::LockUnavailable`].
/// - The lease is released on every exit path: success, error, timeout, and
///   (via [`LeaseGuard`]) cancellation.
/// - The work is bounded by a budget below the lease TTL, so it cannot keep
///   mutating after its lease could have been reclaimed by someone else.
#[derive(Clone)]
pub struct MutationCoordinator {
    locks: LockManager,
    pool: DbPool,
    default_ttl: Duration,
}

impl MutationCoordinator {
    pub fn new(pool: DbPool, config: &CoordinatorConfig) -> Self {
        Self {
            locks: LockManager::new(pool.clone(), config.instance_id.clone()),
            pool,
            default_ttl: config.lock_ttl,
        }
    }

    pub fn locks(&self) -> &LockManager {
        &self.locks
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// [`with_lock_for`](Self::with_lock_for) with the configured default TTL.
    pub async fn with_lock<T, E, F, Fut>(&self, key: &str, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CoordinatorError> + fmt::Display,
    {
        self.with_lock_for(key, self.default_ttl, work).await
    }

    /// Run `work` while holding the lease on `key`.
    ///
    /// No transaction is opened; use this when `work` performs a single
    /// atomic store operation or only non-store side effects.
    pub async fn with_lock_for<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        work: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CoordinatorError> + fmt::Display,
    {
        let guard = self.lease(key, ttl).await?;
        let budget = work_budget(ttl);

        let outcome = match tokio::time::timeout(budget, work()).await {
            Ok(result) => result,
            Err(_) => Err(timeout_error(key, budget).into()),
        };
        if let Err(e) = &outcome {
            tracing::warn!(key, error = %e, "Locked unit of work failed");
        }

        finish(guard).await;
        outcome
    }

    /// [`transactional_with_lock_for`](Self::transactional_with_lock_for) with the
    /// configured default TTL.
    pub async fn transactional_with_lock<T, E, F>(&self, key: &str, work: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>>,
        E: From<CoordinatorError> + fmt::Display,
    {
        self.transactional_with_lock_for(key, self.default_ttl, work)
            .await
    }

    /// Run `work` inside a store transaction while holding the lease on `key`.
    ///
    /// Every statement `work` issues through the connection it is given is
    /// committed together, or, if `work` returns an error or overruns its
    /// budget, rolled back together before the lease is released. The
    /// original error is returned unchanged.
    pub async fn transactional_with_lock_for<T, E, F>(
        &self,
        key: &str,
        ttl: Duration,
        work: F,
    ) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>>,
        E: From<CoordinatorError> + fmt::Display,
    {
        let guard = self.lease(key, ttl).await?;
        let outcome = self.run_in_transaction(key, work_budget(ttl), work).await;
        finish(guard).await;
        outcome
    }

    async fn lease(&self, key: &str, ttl: Duration) -> Result<LeaseGuard, CoordinatorError> {
        validate_lock_key(key).map_err(CoordinatorError::InvalidKey)?;
        match self.locks.acquire(key, ttl).await? {
            Some(lease) => Ok(self.locks.guard(lease)),
            None => Err(CoordinatorError::LockUnavailable {
                key: key.to_string(),
            }),
        }
    }

    async fn run_in_transaction<T, E, F>(
        &self,
        key: &str,
        budget: Duration,
        work: F,
    ) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>>,
        E: From<CoordinatorError> + fmt::Display,
    {
        let mut tx = self.pool.begin().await.map_err(CoordinatorError::from)?;

        match tokio::time::timeout(budget, work(&mut *tx)).await {
            Ok(Ok(value)) => {
                tx.commit().await.map_err(CoordinatorError::from)?;
                Ok(value)
            }
            Ok(Err(e)) => {
                tracing::warn!(key, error = %e, "Unit of work failed, rolling back");
                rollback(tx, key).await;
                Err(e)
            }
            Err(_) => {
                tracing::warn!(
                    key,
                    budget_ms = budget.as_millis() as u64,
                    "Unit of work timed out, rolling back"
                );
                rollback(tx, key).await;
                Err(timeout_error(key, budget).into())
            }
        }
    }
}

/// Time a unit of work may run under a lease of `ttl`.
///
/// Four fifths of the TTL, leaving the rest for commit and release.
fn work_budget(ttl: Duration) -> Duration {
    ttl.saturating_sub(ttl / 5)
}

fn timeout_error(key: &str, budget: Duration) -> CoordinatorError {
    CoordinatorError::Timeout {
        key: key.to_string(),
        budget_ms: budget.as_millis() as u64,
    }
}

async fn rollback(tx: Transaction<'static, Postgres>, key: &str) {
    if let Err(e) = tx.rollback().await {
        // The connection is discarded by the pool; the transaction dies with it.
        tracing::warn!(key, error = %e, "Explicit rollback failed");
    }
}

async fn finish(guard: LeaseGuard) {
    let key = guard.lease().key().to_string();
    if let Err(e) = guard.release().await {
        tracing::warn!(key = %key, error = %e, "Failed to release lock; it will expire");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_leaves_headroom_below_ttl() {
        assert_eq!(work_budget(Duration::from_secs(10)), Duration::from_secs(8));
        assert_eq!(work_budget(Duration::from_millis(500)), Duration::from_millis(400));
        assert!(work_budget(Duration::from_millis(1)) <= Duration::from_millis(1));
    }

    #[test]
    fn timeout_error_names_key_and_budget() {
        let err = timeout_error("profile:1", Duration::from_millis(800));
        assert_eq!(
            err.to_string(),
            "Unit of work under profile:1 exceeded its 800 ms budget"
        );
        assert!(err.is_retryable());
    }
}
