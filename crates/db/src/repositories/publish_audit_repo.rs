//! Repository for the append-only `publish_audit` table.
//!
//! There are deliberately no update or delete methods.

use bulletin_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::publish_audit::{NewPublishAudit, PublishAudit};

/// Column list for `publish_audit` queries.
const COLUMNS: &str = "id, event_id, action, performed_by, channel, performed_at";

pub struct PublishAuditRepo;

impl PublishAuditRepo {
    /// Append one audit row inside an open transaction.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        row: &NewPublishAudit<'_>,
    ) -> Result<PublishAudit, sqlx::Error> {
        let query = format!(
            "INSERT INTO publish_audit (event_id, action, performed_by, channel) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PublishAudit>(&query)
            .bind(row.event_id)
            .bind(row.action)
            .bind(row.performed_by)
            .bind(row.channel)
            .fetch_one(&mut **tx)
            .await
    }

    /// Full history for an event, oldest first.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<PublishAudit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM publish_audit \
             WHERE event_id = $1 \
             ORDER BY performed_at ASC, id ASC"
        );
        sqlx::query_as::<_, PublishAudit>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Every distinct channel ever recorded for an event, read inside the
    /// broadcasting transaction.
    pub async fn distinct_channels(
        tx: &mut Transaction<'_, Postgres>,
        event_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT channel FROM publish_audit WHERE event_id = $1 ORDER BY channel",
        )
        .bind(event_id)
        .fetch_all(&mut **tx)
        .await
    }
}
