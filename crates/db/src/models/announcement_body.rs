//! Announcement body: the content and attachments owned by one event.

use bulletin_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use sqlx::types::Json;

/// A row from the `announcement_bodies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnnouncementBody {
    pub id: DbId,
    pub content: String,
    /// Ordered attachment references, stored as a JSONB array.
    pub attachments: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
