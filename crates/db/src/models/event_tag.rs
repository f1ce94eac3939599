use bulletin_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `event_tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventTag {
    pub id: DbId,
    pub event_id: DbId,
    pub tag: String,
    pub created_at: Timestamp,
}

/// A distinct tag with the number of events carrying it.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TagUsage {
    pub tag: String,
    pub usage_count: i64,
}
