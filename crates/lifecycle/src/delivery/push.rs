//! Push notifications through an HTTP gateway.
//!
//! [`PushDelivery`] POSTs a JSON summary of the event to the configured
//! gateway. There is a single attempt per broadcast; a transport error or
//! non-2xx status is reported to the caller.

use std::fmt;
use std::time::Duration;

use bulletin_core::config::ConfigError;
use bulletin_db::models::event::Event;

use super::{ChannelDelivery, DeliveryError};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Push gateway settings.
///
/// | Variable           | Required | Default |
/// |--------------------|----------|---------|
/// | `PUSH_GATEWAY_URL` | no       | unset   |
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub gateway_url: String,
}

impl PushConfig {
    /// Returns `None` when `PUSH_GATEWAY_URL` is unset.
    pub fn from_lookup<L>(lookup: &L) -> Result<Option<Self>, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let Some(gateway_url) = lookup("PUSH_GATEWAY_URL") else {
            return Ok(None);
        };
        let gateway_url = gateway_url.trim().to_string();
        if !(gateway_url.starts_with("http://") || gateway_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "PUSH_GATEWAY_URL",
                value: gateway_url,
                reason: "must be an http(s) URL".to_string(),
            });
        }
        Ok(Some(Self { gateway_url }))
    }
}

/// Delivers events to the push gateway.
pub struct PushDelivery {
    client: reqwest::Client,
    config: PushConfig,
}

impl PushDelivery {
    pub fn new(config: PushConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }
}

impl fmt::Debug for PushDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushDelivery")
            .field("gateway_url", &self.config.gateway_url)
            .finish_non_exhaustive()
    }
}

/// JSON body sent to the gateway.
fn payload(event: &Event) -> serde_json::Value {
    serde_json::json!({
        "event_id": event.id,
        "title": event.title,
        "summary": event.summary,
        "scheduled_at": event.scheduled_at,
    })
}

#[async_trait::async_trait]
impl ChannelDelivery for PushDelivery {
    async fn deliver(&self, event: &Event) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.config.gateway_url)
            .json(&payload(event))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DeliveryError::HttpStatus(response.status().as_u16()));
        }

        tracing::info!(event_id = event.id, "Push notification sent");
        Ok(())
    }
}
