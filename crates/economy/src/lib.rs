//! Economic event processors.
//!
//! Each processor is a unit of work run through the
//! [`MutationCoordinator`], guarded either by the ledger (`has_event` before
//! applying) or by a uniqueness constraint on the record it creates:
//!
//! | Flow | Lock key | Idempotency witness |
//! |---|---|---|
//! | [`Economy::credit_referral`] | `referral-credit:{new}` | ledger, reference = new subject id |
//! | [`Economy::purchase_item`] | `purchase:{subject}:{item}` | ownership primary key |
//! | [`Economy::claim_task`] | none | completion primary key |
//! | [`Economy::buy_lottery_ticket`] / [`Economy::draw_lottery`] | `lottery-draw:{id}` | lottery `active` flag |
//! | [`Economy::request_withdrawal`] | `profile:{subject}` | new request row |
//! | [`Economy::approve_withdrawal`] / [`Economy::reject_withdrawal`] | `withdrawal:{id}` | `pending` status |
//!
//! Notifications are published on the [`EventBus`] only after commit.

use std::sync::Arc;

use rewards_coordinator::MutationCoordinator;
use rewards_db::DbPool;
use rewards_events::{EconomicEvent, EventBus};

pub mod config;
pub mod error;
pub mod lottery;
pub mod purchase;
pub mod referral;
pub mod task;
pub mod withdrawal;

pub use config::EconomyConfig;
pub use error::EconomyError;
pub use lottery::{DrawOutcome, TicketPurchase};
pub use purchase::PurchaseOutcome;
pub use referral::{ReferralOutcome, SecondLevelCredit};
pub use task::{AlwaysVerified, TaskClaimOutcome, TaskVerifier};
pub use withdrawal::WithdrawalOutcome;

/// Entry point for every economic event processor.
///
/// Cheaply cloneable; clones share the coordinator, bus and verifier.
#[derive(Clone)]
pub struct Economy {
    coordinator: MutationCoordinator,
    bus: Arc<EventBus>,
    config: EconomyConfig,
    verifier: Arc<dyn TaskVerifier>,
}

impl Economy {
    pub fn new(
        coordinator: MutationCoordinator,
        bus: Arc<EventBus>,
        config: EconomyConfig,
    ) -> Self {
        Self {
            coordinator,
            bus,
            config,
            verifier: Arc::new(AlwaysVerified),
        }
    }

    /// Replace the task verifier consulted before a task claim.
    pub fn with_verifier(mut self, verifier: Arc<dyn TaskVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn coordinator(&self) -> &MutationCoordinator {
        &self.coordinator
    }

    pub fn pool(&self) -> &DbPool {
        self.coordinator.pool()
    }

    /// Fire-and-forget announcement of a committed event.
    fn notify(&self, event: EconomicEvent) {
        self.bus.publish(event);
    }
}
