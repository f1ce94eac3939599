//! Announcement event entity model and DTOs.

use bulletin_core::error::CoreError;
use bulletin_core::lifecycle::EventStatus;
use bulletin_core::pagination::PageRequest;
use bulletin_core::types::{DbId, Timestamp};
use bulletin_core::validation::{normalize_tags, validate_content, validate_text, validate_title};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::announcement_body::AnnouncementBody;
use super::event_tag::EventTag;
use super::publish_audit::PublishAudit;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub summary: Option<String>,
    pub body_id: DbId,
    pub created_by: DbId,
    pub status: String,
    pub scheduled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    /// Parsed lifecycle status.
    pub fn status(&self) -> Result<EventStatus, CoreError> {
        self.status.parse()
    }
}

/// An event with its body, tags and full publish history.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    pub event: Event,
    pub body: Option<AnnouncementBody>,
    pub tags: Vec<EventTag>,
    pub audit: Vec<PublishAudit>,
}

/// DTO for creating an event together with its body and tags.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub created_by: DbId,
    /// Defaults to `draft` when absent.
    pub status: Option<String>,
    pub scheduled_at: Option<Timestamp>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The parts of a [`CreateEvent`] normalised by validation.
#[derive(Debug, Clone)]
pub(crate) struct ValidatedCreate {
    pub status: EventStatus,
    pub tags: Vec<String>,
}

impl CreateEvent {
    pub(crate) fn validate(&self) -> Result<ValidatedCreate, CoreError> {
        validate_title(&self.title)?;
        validate_content(&self.content)?;
        if let Some(summary) = &self.summary {
            validate_text("summary", summary)?;
        }
        for attachment in &self.attachments {
            validate_text("attachments", attachment)?;
        }
        let status = match &self.status {
            Some(s) => s.parse()?,
            None => EventStatus::Draft,
        };
        let tags = normalize_tags(&self.tags)?;
        Ok(ValidatedCreate { status, tags })
    }
}

/// DTO for a partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    /// If `Some`, replaces the full tag set (an empty list clears it).
    pub tags: Option<Vec<String>>,
    pub scheduled_at: Option<Timestamp>,
}

impl UpdateEvent {
    /// Validate present fields, returning the normalised tag set if present.
    pub(crate) fn validate(&self) -> Result<Option<Vec<String>>, CoreError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(summary) = &self.summary {
            validate_text("summary", summary)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        self.tags.as_deref().map(normalize_tags).transpose()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.summary.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.scheduled_at.is_none()
    }
}

/// Filters for the paged event listing.
#[derive(Debug, Clone, Default)]
pub struct EventListFilter {
    /// Keep events whose latest audit channel matches, plus never-audited events.
    pub channel: Option<String>,
    /// Keep events scheduled at or after this instant.
    pub since: Option<Timestamp>,
    pub page: PageRequest,
}
