//! External delivery channels for approved announcements.
//!
//! Each [`Channel`] is served by one [`ChannelDelivery`] implementation held
//! in a [`DeliveryRegistry`]. The broadcast engine looks deliverers up by
//! channel and treats a failure as fatal for the whole broadcast.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bulletin_core::config::{env_lookup, ConfigError};
use bulletin_core::lifecycle::Channel;
use bulletin_db::models::event::Event;

pub mod email;
pub mod log;
pub mod push;

pub use email::{EmailConfig, EmailDelivery};
pub use log::LogDelivery;
pub use push::{PushConfig, PushDelivery};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for delivery failures and deliverer construction.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The push gateway returned a non-2xx status code.
    #[error("Push gateway returned HTTP {0}")]
    HttpStatus(u16),

    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A sender or recipient address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// ChannelDelivery
// ---------------------------------------------------------------------------

/// A capability that delivers one event over one channel.
///
/// Implementations must be safe to share across request handlers. A
/// returned error aborts the broadcast that invoked it.
#[async_trait::async_trait]
pub trait ChannelDelivery: Send + Sync {
    async fn deliver(&self, event: &Event) -> Result<(), DeliveryError>;
}

// ---------------------------------------------------------------------------
// DeliveryRegistry
// ---------------------------------------------------------------------------

/// Maps each channel to the deliverer that serves it.
#[derive(Clone, Default)]
pub struct DeliveryRegistry {
    deliverers: HashMap<Channel, Arc<dyn ChannelDelivery>>,
}

impl DeliveryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, channel: Channel, deliverer: Arc<dyn ChannelDelivery>) -> Self {
        self.register(channel, deliverer);
        self
    }

    /// Register (or replace) the deliverer for `channel`.
    pub fn register(&mut self, channel: Channel, deliverer: Arc<dyn ChannelDelivery>) {
        self.deliverers.insert(channel, deliverer);
    }

    pub fn get(&self, channel: Channel) -> Option<&Arc<dyn ChannelDelivery>> {
        self.deliverers.get(&channel)
    }

    /// A registry where every channel only logs its deliveries.
    pub fn logging() -> Self {
        Self::new()
            .with(Channel::Push, Arc::new(LogDelivery::new(Channel::Push)))
            .with(Channel::Email, Arc::new(LogDelivery::new(Channel::Email)))
    }

    /// Build the registry from the process environment.
    pub fn from_env() -> Result<Self, DeliveryError> {
        Self::from_lookup(env_lookup)
    }

    /// Build the registry from a variable lookup.
    ///
    /// A channel whose configuration is absent falls back to
    /// [`LogDelivery`], so every known channel always has a deliverer.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, DeliveryError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut registry = Self::logging();

        match PushConfig::from_lookup(&lookup)? {
            Some(config) => {
                tracing::info!(gateway = %config.gateway_url, "Push delivery enabled");
                registry.register(Channel::Push, Arc::new(PushDelivery::new(config)?));
            }
            None => tracing::warn!("PUSH_GATEWAY_URL not set, push deliveries are logged only"),
        }

        match EmailConfig::from_lookup(&lookup)? {
            Some(config) => {
                tracing::info!(
                    smtp_host = %config.smtp_host,
                    recipients = config.recipients.len(),
                    "Email delivery enabled"
                );
                registry.register(Channel::Email, Arc::new(EmailDelivery::new(config)?));
            }
            None => tracing::warn!("SMTP_HOST not set, email deliveries are logged only"),
        }

        Ok(registry)
    }

    fn channels(&self) -> Vec<Channel> {
        let mut channels: Vec<Channel> = self.deliverers.keys().copied().collect();
        channels.sort_by_key(|c| c.as_str());
        channels
    }
}

impl fmt::Debug for DeliveryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryRegistry")
            .field("channels", &self.channels())
            .finish()
    }
}
