//! Announcement delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport and sends one
//! plain-text message per broadcast to the configured recipient list. If
//! `SMTP_HOST` is not set, [`EmailConfig::from_lookup`] returns `None` and
//! no mailer is constructed.

use std::fmt;

use bulletin_core::config::{parse_or, required, split_list, ConfigError};
use bulletin_db::models::event::Event;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{ChannelDelivery, DeliveryError};

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "announcements@bulletin.local";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    /// Every broadcast is sent to all of these addresses.
    pub recipients: Vec<String>,
}

impl EmailConfig {
    /// Load configuration from a variable lookup.
    ///
    /// | Variable            | Required           | Default                         |
    /// |---------------------|--------------------|---------------------------------|
    /// | `SMTP_HOST`         | enables email      | unset                           |
    /// | `SMTP_PORT`         | no                 | `587`                           |
    /// | `SMTP_FROM`         | no                 | `announcements@bulletin.local`  |
    /// | `SMTP_USER`         | no                 | unset                           |
    /// | `SMTP_PASSWORD`     | no                 | unset                           |
    /// | `ANNOUNCE_EMAIL_TO` | with `SMTP_HOST`   | comma-separated list            |
    pub fn from_lookup<L>(lookup: &L) -> Result<Option<Self>, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let Some(smtp_host) = lookup("SMTP_HOST") else {
            return Ok(None);
        };

        let recipients = split_list(&required(lookup, "ANNOUNCE_EMAIL_TO")?);
        if recipients.is_empty() {
            return Err(ConfigError::Missing("ANNOUNCE_EMAIL_TO"));
        }

        Ok(Some(Self {
            smtp_host,
            smtp_port: parse_or(lookup, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            from_address: lookup("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: lookup("SMTP_USER"),
            smtp_password: lookup("SMTP_PASSWORD"),
            recipients,
        }))
    }
}

/// Sends announcement emails via SMTP.
pub struct EmailDelivery {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    recipients: Vec<Mailbox>,
}

impl EmailDelivery {
    /// Build the transport and parse every address up front, so a bad
    /// address fails at startup rather than mid-broadcast.
    pub fn new(config: EmailConfig) -> Result<Self, DeliveryError> {
        let from: Mailbox = config.from_address.parse()?;
        let recipients = config
            .recipients
            .iter()
            .map(|r| r.parse::<Mailbox>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (config.smtp_user, config.smtp_password) {
            transport_builder = transport_builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            mailer: transport_builder.build(),
            from,
            recipients,
        })
    }

    fn build_message(&self, event: &Event) -> Result<Message, DeliveryError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(format!("[Announcement] {}", event.title))
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }

        builder
            .body(render_body(event))
            .map_err(|e| DeliveryError::Build(e.to_string()))
    }
}

impl fmt::Debug for EmailDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailDelivery")
            .field("from", &self.from)
            .field("recipients", &self.recipients)
            .finish_non_exhaustive()
    }
}

fn render_body(event: &Event) -> String {
    let mut body = event.title.clone();
    if let Some(summary) = &event.summary {
        body.push_str("\n\n");
        body.push_str(summary);
    }
    if let Some(at) = event.scheduled_at {
        body.push_str(&format!("\n\nScheduled: {}", at.format("%Y-%m-%d %H:%M UTC")));
    }
    body
}

#[async_trait::async_trait]
impl ChannelDelivery for EmailDelivery {
    async fn deliver(&self, event: &Event) -> Result<(), DeliveryError> {
        let message = self.build_message(event)?;
        self.mailer.send(message).await?;

        tracing::info!(
            event_id = event.id,
            recipients = self.recipients.len(),
            "Announcement email sent"
        );
        Ok(())
    }
}
