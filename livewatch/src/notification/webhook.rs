//! Generic webhook notification sink.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use super::NotificationSink;
use crate::monitor::MonitorEvent;
use crate::{Error, Result};

/// Sink that POSTs one JSON document per transition event.
///
/// Payload shape:
///
/// ```json
/// {"event": "online", "login": "somechannel", "url": "https://twitch.tv/somechannel", "message": "..."}
/// ```
pub struct WebhookSink {
    url: String,
    client: Client,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            url: url.into(),
            client,
        }
    }

    /// Serialize an event into the webhook payload, if it carries one.
    fn payload(event: &MonitorEvent) -> Option<serde_json::Value> {
        match event {
            MonitorEvent::ChannelOnline { login, url, .. } => Some(json!({
                "event": "online",
                "login": login,
                "url": url,
                "message": event.description(),
            })),
            MonitorEvent::ChannelOffline { login, url, .. } => Some(json!({
                "event": "offline",
                "login": login,
                "url": url,
                "message": event.description(),
            })),
            MonitorEvent::CycleCompleted { .. } => None,
        }
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn sink_type(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, event: &MonitorEvent) -> Result<()> {
        let Some(payload) = Self::payload(event) else {
            return Ok(());
        };

        debug!(url = %self.url, "delivering webhook notification");

        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| Error::Other(format!("webhook delivery failed: {e}")))?;

        Ok(())
    }
}
