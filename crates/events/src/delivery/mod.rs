//! Notification delivery channels.

use async_trait::async_trait;

use crate::bus::EconomicEvent;

pub mod log;
pub mod webhook;

/// Error returned by a channel that failed to deliver.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Delivery failed: {0}")]
    Other(String),
}

/// A destination for economic event notifications.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn deliver(&self, event: &EconomicEvent) -> Result<(), DeliveryError>;
}
