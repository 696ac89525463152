//! Channel that writes each notification as a structured log line.

use async_trait::async_trait;

use super::{DeliveryError, NotificationChannel};
use crate::bus::EconomicEvent;

/// Always-on channel; useful on its own in development.
#[derive(Debug, Default)]
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, event: &EconomicEvent) -> Result<(), DeliveryError> {
        tracing::info!(
            event_type = %event.event_type,
            subject_id = event.subject_id,
            payload = %event.payload,
            "Notification"
        );
        Ok(())
    }
}
