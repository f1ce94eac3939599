//! Append-only publish audit history.

use bulletin_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `publish_audit` table. Never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublishAudit {
    pub id: DbId,
    pub event_id: DbId,
    pub action: String,
    pub performed_by: DbId,
    pub channel: String,
    pub performed_at: Timestamp,
}

/// Values for a new audit row; `performed_at` is set by the database.
#[derive(Debug, Clone)]
pub struct NewPublishAudit<'a> {
    pub event_id: DbId,
    pub action: &'a str,
    pub performed_by: DbId,
    pub channel: &'a str,
}
