//! Bus consumer that fans each event out to the notification channels.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::bus::EconomicEvent;
use crate::delivery::NotificationChannel;

/// Delivers every published [`EconomicEvent`] to each configured channel.
///
/// A failing channel is logged and skipped; it never affects other
/// channels, later events, or the mutation that published the event.
pub struct NotificationDispatcher {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl NotificationDispatcher {
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Run the dispatch loop.
    ///
    /// Exits when the channel is closed (the [`EventBus`](crate::EventBus)
    /// is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<EconomicEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.dispatch(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification dispatcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver one event to every channel.
    pub async fn dispatch(&self, event: &EconomicEvent) {
        for channel in &self.channels {
            if let Err(e) = channel.deliver(event).await {
                tracing::error!(
                    channel = channel.name(),
                    event_type = %event.event_type,
                    subject_id = event.subject_id,
                    error = %e,
                    "Notification delivery failed"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
