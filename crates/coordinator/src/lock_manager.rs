//! Lease-based named locks stored in the shared database.
//!
//! `acquire` never blocks: a key held by a live lease is reported as
//! unavailable immediately, and retry policy belongs to the caller. A lease
//! past its expiry is overwritten by the next acquirer, so a crashed holder
//! can never wedge a key; correctness does not depend on
//! [`LockManager::cleanup_expired`] ever running.

use std::sync::Arc;
use std::time::Duration;

use rewards_core::types::Timestamp;
use rewards_db::models::lock::Lock;
use rewards_db::repositories::LockRepo;
use rewards_db::DbPool;

use crate::instance::lease_holder_id;

// ---------------------------------------------------------------------------
// Lease
// ---------------------------------------------------------------------------

/// A lease currently believed to be held by this process.
#[derive(Debug, Clone)]
pub struct Lease {
    key: String,
    holder_id: String,
    expires_at: Timestamp,
}

impl Lease {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn holder_id(&self) -> &str {
        &self.holder_id
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }
}

impl From<Lock> for Lease {
    fn from(lock: Lock) -> Self {
        Self {
            key: lock.lock_key,
            holder_id: lock.holder_id,
            expires_at: lock.expires_at,
        }
    }
}

// ---------------------------------------------------------------------------
// LockManager
// ---------------------------------------------------------------------------

/// Acquires, extends and releases leases on behalf of one service instance.
///
/// Cheaply cloneable; clones share the pool and instance id.
#[derive(Clone)]
pub struct LockManager {
    pool: DbPool,
    instance_id: Arc<str>,
}

impl LockManager {
    pub fn new(pool: DbPool, instance_id: impl Into<String>) -> Self {
        Self {
            pool,
            instance_id: Arc::from(instance_id.into()),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Try to take the lease on `key` for `ttl`.
    ///
    /// Returns `None` when another live lease holds the key. Two leases taken
    /// by the same instance are distinct holders, so this is not re-entrant.
    pub async fn acquire(&self, key: &str, ttl: Duration) -> Result<Option<Lease>, sqlx::Error> {
        let holder_id = lease_holder_id(&self.instance_id);

        match LockRepo::try_acquire(&self.pool, key, &holder_id, ttl).await? {
            Some(acquired) => {
                if acquired.reclaimed {
                    tracing::warn!(
                        key,
                        holder_id = %holder_id,
                        "Reclaimed expired lock from a previous holder"
                    );
                } else {
                    tracing::debug!(key, holder_id = %holder_id, "Lock acquired");
                }
                Ok(Some(Lease::from(acquired.lock)))
            }
            None => {
                tracing::debug!(key, "Lock held by another holder");
                Ok(None)
            }
        }
    }

    /// Release a lease. Deletes the row only if this lease still holds it.
    ///
    /// Returns `false` if the lease had already been reclaimed by someone
    /// else after expiring; their lease is left untouched.
    pub async fn release(&self, lease: &Lease) -> Result<bool, sqlx::Error> {
        let released = LockRepo::release(&self.pool, &lease.key, &lease.holder_id).await?;
        if released {
            tracing::debug!(key = %lease.key, "Lock released");
        } else {
            tracing::warn!(
                key = %lease.key,
                holder_id = %lease.holder_id,
                "Lock was lost before release (expired and reclaimed)"
            );
        }
        Ok(released)
    }

    /// Heartbeat: push a live lease's expiry to `now + ttl`.
    ///
    /// Returns `false` once the lease has expired; the caller must then
    /// assume another instance may be running the same unit of work.
    pub async fn extend(&self, lease: &mut Lease, ttl: Duration) -> Result<bool, sqlx::Error> {
        match LockRepo::extend(&self.pool, &lease.key, &lease.holder_id, ttl).await? {
            Some(lock) => {
                lease.expires_at = lock.expires_at;
                tracing::debug!(key = %lease.key, expires_at = %lease.expires_at, "Lock extended");
                Ok(true)
            }
            None => {
                tracing::warn!(key = %lease.key, "Cannot extend a lock that is no longer held");
                Ok(false)
            }
        }
    }

    /// The live lease on `key`, if any.
    pub async fn holder(&self, key: &str) -> Result<Option<Lock>, sqlx::Error> {
        LockRepo::get_live(&self.pool, key).await
    }

    /// Best-effort housekeeping: delete expired lease rows.
    pub async fn cleanup_expired(&self) -> Result<u64, sqlx::Error> {
        LockRepo::cleanup_expired(&self.pool).await
    }

    /// Wrap a lease so it is released even if the owning future is dropped.
    pub fn guard(&self, lease: Lease) -> LeaseGuard {
        LeaseGuard {
            manager: self.clone(),
            lease,
            released: false,
        }
    }
}

// ---------------------------------------------------------------------------
// LeaseGuard
// ---------------------------------------------------------------------------

/// Owns a lease until [`LeaseGuard::release`] is awaited.
///
/// If the guard is dropped without an explicit release (the owning future
/// was cancelled, or panicked), a release is spawned onto the current tokio
/// runtime. Should that fail too, the lease simply expires.
pub struct LeaseGuard {
    manager: LockManager,
    lease: Lease,
    released: bool,
}

impl LeaseGuard {
    pub fn lease(&self) -> &Lease {
        &self.lease
    }

    /// Heartbeat the guarded lease.
    pub async fn extend(&mut self, ttl: Duration) -> Result<bool, sqlx::Error> {
        self.manager.extend(&mut self.lease, ttl).await
    }

    /// Release the lease now.
    pub async fn release(mut self) -> Result<bool, sqlx::Error> {
        let result = self.manager.release(&self.lease).await;
        self.released = true;
        result
    }
}

impl Drop for LeaseGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                key = %self.lease.key,
                "No runtime to release dropped lock; it will expire"
            );
            return;
        };
        let manager = self.manager.clone();
        let lease = self.lease.clone();
        handle.spawn(async move {
            if let Err(e) = manager.release(&lease).await {
                tracing::warn!(key = %lease.key, error = %e, "Deferred lock release failed");
            }
        });
    }
}
