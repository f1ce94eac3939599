//! Log-only deliverer for channels with no configured transport.

use bulletin_core::lifecycle::Channel;
use bulletin_db::models::event::Event;

use super::{ChannelDelivery, DeliveryError};

/// Records the delivery attempt in the log and always succeeds.
#[derive(Debug, Clone, Copy)]
pub struct LogDelivery {
    channel: Channel,
}

impl LogDelivery {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

#[async_trait::async_trait]
impl ChannelDelivery for LogDelivery {
    async fn deliver(&self, event: &Event) -> Result<(), DeliveryError> {
        tracing::info!(
            event_id = event.id,
            channel = %self.channel,
            title = %event.title,
            "Delivery logged (channel not configured)"
        );
        Ok(())
    }
}
