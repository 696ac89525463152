//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`EconomicEvent`]s. It is
//! shared via `Arc<EventBus>` between the processors and the dispatcher.

use chrono::{DateTime, Utc};
use rewards_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// Dot-separated names of the events processors publish.
pub mod kinds {
    pub const REFERRAL_CREDITED: &str = "referral.credited";
    pub const ITEM_PURCHASED: &str = "item.purchased";
    pub const TASK_REWARDED: &str = "task.rewarded";
    pub const LOTTERY_TICKET_PURCHASED: &str = "lottery.ticket_purchased";
    pub const LOTTERY_WON: &str = "lottery.won";
    pub const WITHDRAWAL_REQUESTED: &str = "withdrawal.requested";
    pub const WITHDRAWAL_APPROVED: &str = "withdrawal.approved";
    pub const WITHDRAWAL_REJECTED: &str = "withdrawal.rejected";
}

// ---------------------------------------------------------------------------
// EconomicEvent
// ---------------------------------------------------------------------------

/// A committed change to a subject's account, addressed to that subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicEvent {
    /// Dot-separated event name, one of [`kinds`].
    pub event_type: String,

    /// The subject the notification is for.
    pub subject_id: DbId,

    /// Event-specific data (amounts, ids).
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl EconomicEvent {
    pub fn new(event_type: impl Into<String>, subject_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            subject_id,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use rewards_events::bus::{kinds, EconomicEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(EconomicEvent::new(kinds::TASK_REWARDED, 42));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<EconomicEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: EconomicEvent) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EconomicEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
