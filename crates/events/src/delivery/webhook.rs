//! Webhook delivery with exponential-backoff retry.
//!
//! [`WebhookDelivery`] POSTs a JSON-encoded [`EconomicEvent`] to a fixed
//! URL. Failed attempts are retried with exponential backoff.

use std::time::Duration;

use async_trait::async_trait;

use super::{DeliveryError, NotificationChannel};
use crate::bus::EconomicEvent;

/// Retry delays (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers economic events to one external webhook endpoint.
pub struct WebhookDelivery {
    client: reqwest::Client,
    url: String,
    retry_delays: Vec<Duration>,
}

impl WebhookDelivery {
    pub fn new(url: impl Into<String>) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            retry_delays: RETRY_DELAYS.to_vec(),
        })
    }

    /// Override the backoff schedule (one retry per entry).
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, payload: &serde_json::Value) -> Result<(), DeliveryError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(DeliveryError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for WebhookDelivery {
    fn name(&self) -> &str {
        "webhook"
    }

    /// Deliver with retry; returns `Ok(())` on the first successful attempt.
    async fn deliver(&self, event: &EconomicEvent) -> Result<(), DeliveryError> {
        let payload = serde_json::json!({
            "event_type": event.event_type,
            "subject_id": event.subject_id,
            "payload": event.payload,
            "timestamp": event.timestamp,
        });

        for (attempt, delay) in self.retry_delays.iter().enumerate() {
            match self.try_send(&payload).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url = %self.url,
                        error = %e,
                        "Webhook delivery attempt failed, retrying"
                    );
                    tokio::time::sleep(*delay).await;
                }
            }
        }

        // Final attempt after the last backoff.
        self.try_send(&payload).await.inspect_err(|e| {
            tracing::error!(
                url = %self.url,
                error = %e,
                "Webhook delivery failed after all retries"
            );
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_url() {
        let delivery = WebhookDelivery::new("http://localhost:9/hook").unwrap();
        assert_eq!(delivery.url(), "http://localhost:9/hook");
        assert_eq!(delivery.name(), "webhook");
    }

    #[test]
    fn http_status_error_display() {
        let err = DeliveryError::HttpStatus(502);
        assert_eq!(err.to_string(), "Webhook returned HTTP 502");
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_after_retries() {
        // Port 9 (discard) is closed on test hosts; connect fails immediately.
        let delivery = WebhookDelivery::new("http://127.0.0.1:9/hook")
            .unwrap()
            .with_retry_delays(vec![Duration::from_millis(1)]);

        let result = delivery
            .deliver(&EconomicEvent::new(crate::bus::kinds::LOTTERY_WON, 1))
            .await;
        assert!(matches!(result, Err(DeliveryError::Request(_))));
    }
}
