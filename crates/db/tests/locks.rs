//! Integration tests for the `locks` lease table.
//!
//! - Mutual exclusion between holders
//! - Reclaiming an expired lease
//! - Holder-only release and extend
//! - Expired-lease housekeeping

use std::time::Duration;

use rewards_db::repositories::LockRepo;
use sqlx::PgPool;

const LONG: Duration = Duration::from_secs(30);
const SHORT: Duration = Duration::from_millis(50);

async fn wait_past(ttl: Duration) {
    tokio::time::sleep(ttl + Duration::from_millis(150)).await;
}

// ---------------------------------------------------------------------------
// Test: a live lease excludes every other holder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_live_lease_is_exclusive(pool: PgPool) {
    let first = LockRepo::try_acquire(&pool, "purchase:1:1", "a:1", LONG)
        .await
        .unwrap()
        .expect("free key should be acquired");
    assert_eq!(first.lock.holder_id, "a:1");
    assert!(!first.reclaimed);
    assert!(first.lock.expires_at > first.lock.acquired_at);

    let second = LockRepo::try_acquire(&pool, "purchase:1:1", "b:1", LONG)
        .await
        .unwrap();
    assert!(second.is_none(), "live lease must not be taken");

    // The same holder does not re-enter either.
    let again = LockRepo::try_acquire(&pool, "purchase:1:1", "a:1", LONG)
        .await
        .unwrap();
    assert!(again.is_none());

    // Unrelated keys are independent.
    assert!(LockRepo::try_acquire(&pool, "purchase:1:2", "b:1", LONG)
        .await
        .unwrap()
        .is_some());
}

// ---------------------------------------------------------------------------
// Test: concurrent acquires never both succeed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_acquire_single_winner(pool: PgPool) {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let pool = pool.clone();
            tokio::spawn(async move {
                LockRepo::try_acquire(&pool, "lottery-draw:9", &format!("holder:{i}"), LONG)
                    .await
                    .unwrap()
                    .is_some()
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

// ---------------------------------------------------------------------------
// Test: an expired lease is reclaimed by the next acquire
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_lease_is_reclaimed(pool: PgPool) {
    LockRepo::try_acquire(&pool, "profile:5", "crashed:1", SHORT)
        .await
        .unwrap()
        .unwrap();

    wait_past(SHORT).await;

    // No cleanup pass has run; acquire alone re-checks expiry.
    let stolen = LockRepo::try_acquire(&pool, "profile:5", "rescuer:1", LONG)
        .await
        .unwrap()
        .expect("expired lease should be reclaimable");
    assert!(stolen.reclaimed);
    assert_eq!(stolen.lock.holder_id, "rescuer:1");

    // The crashed holder can no longer release or extend the reclaimed lease.
    assert!(!LockRepo::release(&pool, "profile:5", "crashed:1").await.unwrap());
    assert!(LockRepo::extend(&pool, "profile:5", "crashed:1", LONG)
        .await
        .unwrap()
        .is_none());

    let live = LockRepo::get_live(&pool, "profile:5").await.unwrap().unwrap();
    assert_eq!(live.holder_id, "rescuer:1");
}

// ---------------------------------------------------------------------------
// Test: only the holder releases
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_release_requires_holder(pool: PgPool) {
    LockRepo::try_acquire(&pool, "withdrawal:1", "a:1", LONG)
        .await
        .unwrap()
        .unwrap();

    assert!(!LockRepo::release(&pool, "withdrawal:1", "b:1").await.unwrap());
    assert!(LockRepo::get_live(&pool, "withdrawal:1").await.unwrap().is_some());

    assert!(LockRepo::release(&pool, "withdrawal:1", "a:1").await.unwrap());
    assert!(LockRepo::get_live(&pool, "withdrawal:1").await.unwrap().is_none());

    // Released keys are immediately free.
    assert!(LockRepo::try_acquire(&pool, "withdrawal:1", "b:1", LONG)
        .await
        .unwrap()
        .is_some());
}

// ---------------------------------------------------------------------------
// Test: extend pushes expiry for the live holder only
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_extend_live_lease(pool: PgPool) {
    let acquired = LockRepo::try_acquire(&pool, "referral-credit:3", "a:1", Duration::from_secs(2))
        .await
        .unwrap()
        .unwrap();

    let extended = LockRepo::extend(&pool, "referral-credit:3", "a:1", LONG)
        .await
        .unwrap()
        .expect("holder should extend a live lease");
    assert!(extended.expires_at > acquired.lock.expires_at);

    assert!(LockRepo::extend(&pool, "referral-credit:3", "b:1", LONG)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: cleanup removes only expired leases
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cleanup_expired(pool: PgPool) {
    LockRepo::try_acquire(&pool, "k:expired-1", "a:1", SHORT).await.unwrap().unwrap();
    LockRepo::try_acquire(&pool, "k:expired-2", "a:2", SHORT).await.unwrap().unwrap();
    LockRepo::try_acquire(&pool, "k:live", "a:3", LONG).await.unwrap().unwrap();

    wait_past(SHORT).await;

    assert_eq!(LockRepo::cleanup_expired(&pool).await.unwrap(), 2);
    assert_eq!(LockRepo::cleanup_expired(&pool).await.unwrap(), 0);
    assert!(LockRepo::get_live(&pool, "k:live").await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Test: only unexpired leases are counted as live
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_count_live_ignores_expired(pool: PgPool) {
    assert_eq!(LockRepo::count_live(&pool).await.unwrap(), 0);

    LockRepo::try_acquire(&pool, "k:short", "a:1", SHORT).await.unwrap().unwrap();
    LockRepo::try_acquire(&pool, "k:long-1", "a:2", LONG).await.unwrap().unwrap();
    LockRepo::try_acquire(&pool, "k:long-2", "a:3", LONG).await.unwrap().unwrap();
    assert_eq!(LockRepo::count_live(&pool).await.unwrap(), 3);

    wait_past(SHORT).await;

    // The expired row is still present until cleanup runs.
    assert_eq!(LockRepo::count_live(&pool).await.unwrap(), 2);
}
