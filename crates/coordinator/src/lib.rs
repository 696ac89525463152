//! Cross-process mutual exclusion over the shared store.
//!
//! Instances of the service share nothing but the database, so an
//! in-process mutex cannot exclude a racing writer on another machine.
//! This crate provides:
//!
//! - [`LockManager`]: non-blocking, lease-based named locks stored as rows
//!   in the `locks` table. Expired leases are reclaimable by anyone.
//! - [`MutationCoordinator`]: "run this unit of work with at most one
//!   concurrent executor across all instances", optionally inside a store
//!   transaction that is rolled back on any error.
//! - [`Ledger`]: the idempotency witness: `has_event` / `record_event`,
//!   always called inside a coordinator-protected transaction.
//!
//! # Usage
//!
//! ```rust,ignore
//! let coordinator = MutationCoordinator::new(pool, &CoordinatorConfig::from_env()?);
//!
//! let credited = coordinator
//!     .transactional_with_lock(&lock_keys::referral_credit(new_id), move |conn| {
//!         Box::pin(async move {
//!             if Ledger::has_event(conn, referrer, EventType::ReferralLevel1, &reference).await? {
//!                 return Ok(false);
//!             }
//!             AccountRepo::credit(&mut *conn, referrer, reward).await?;
//!             let event = EventType::ReferralLevel1;
//!             Ledger::record_event(conn, referrer, event, reward, &reference).await?;
//!             Ok::<_, MyError>(true)
//!         })
//!     })
//!     .await?;
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod instance;
pub mod ledger;
pub mod lock_manager;

pub use config::CoordinatorConfig;
pub use coordinator::MutationCoordinator;
pub use error::CoordinatorError;
pub use ledger::Ledger;
pub use lock_manager::{Lease, LeaseGuard, LockManager};
