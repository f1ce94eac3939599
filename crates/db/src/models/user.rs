use bulletin_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Directory entry returned by the user listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub display_name: String,
}
