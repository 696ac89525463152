//! Periodic deletion of expired lease rows.
//!
//! Acquire reclaims expired leases on its own, so this only keeps the
//! `locks` table small. A failed pass is logged and retried next tick.

use std::time::Duration;

use rewards_coordinator::LockManager;
use tokio_util::sync::CancellationToken;

/// Run the lock cleanup loop every `interval` until `cancel` is triggered.
pub async fn run(locks: LockManager, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        instance_id = locks.instance_id(),
        "Lock cleanup job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Lock cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                match locks.cleanup_expired().await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Lock cleanup: purged expired leases");
                        } else {
                            tracing::debug!("Lock cleanup: no expired leases");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Lock cleanup: pass failed");
                    }
                }
            }
        }
    }
}
