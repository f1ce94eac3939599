//! Repository for the `event_tags` table.
//!
//! Tags are a child collection of events: they are written only as part of
//! an event create/update transaction and replaced wholesale, never merged.

use bulletin_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::event_tag::{EventTag, TagUsage};

/// Column list for `event_tags` queries.
const COLUMNS: &str = "id, event_id, tag, created_at";

/// Default suggestion count for autocomplete.
pub const DEFAULT_SUGGEST_LIMIT: i64 = 5;

/// Maximum suggestion count for autocomplete.
pub const MAX_SUGGEST_LIMIT: i64 = 50;

pub struct TagRepo;

impl TagRepo {
    /// All tags on an event in insertion order.
    pub async fn list_for_event(pool: &PgPool, event_id: DbId) -> Result<Vec<EventTag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM event_tags WHERE event_id = $1 ORDER BY id");
        sqlx::query_as::<_, EventTag>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Every distinct tag with its usage count, most used first.
    pub async fn list_usage(pool: &PgPool) -> Result<Vec<TagUsage>, sqlx::Error> {
        sqlx::query_as::<_, TagUsage>(
            "SELECT tag, COUNT(*) AS usage_count FROM event_tags \
             GROUP BY tag \
             ORDER BY usage_count DESC, tag",
        )
        .fetch_all(pool)
        .await
    }

    /// Autocomplete: distinct tags starting with `prefix` (case-insensitive),
    /// most used first.
    pub async fn suggest(
        pool: &PgPool,
        prefix: &str,
        limit: Option<i64>,
    ) -> Result<Vec<TagUsage>, sqlx::Error> {
        let limit = clamp_suggest_limit(limit);
        let pattern = format!("{}%", escape_like(&prefix.trim().to_lowercase()));

        sqlx::query_as::<_, TagUsage>(
            "SELECT tag, COUNT(*) AS usage_count FROM event_tags \
             WHERE LOWER(tag) LIKE $1 ESCAPE '\\' \
             GROUP BY tag \
             ORDER BY usage_count DESC, tag \
             LIMIT $2",
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Transaction-scoped writes
    // -----------------------------------------------------------------------

    /// Insert one row per tag for an event.
    pub(crate) async fn insert_all(
        tx: &mut Transaction<'_, Postgres>,
        event_id: DbId,
        tags: &[String],
    ) -> Result<(), sqlx::Error> {
        for tag in tags {
            sqlx::query("INSERT INTO event_tags (event_id, tag) VALUES ($1, $2)")
                .bind(event_id)
                .bind(tag)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    /// Replace the full tag set of an event. An empty slice clears it.
    pub(crate) async fn replace_all(
        tx: &mut Transaction<'_, Postgres>,
        event_id: DbId,
        tags: &[String],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM event_tags WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut **tx)
            .await?;

        Self::insert_all(tx, event_id, tags).await
    }
}

fn clamp_suggest_limit(limit: Option<i64>) -> i64 {
    limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_SUGGEST_LIMIT)
        .min(MAX_SUGGEST_LIMIT)
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
