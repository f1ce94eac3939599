//! Repository for the `events` and `announcement_bodies` tables.
//!
//! An event and its body are created in one transaction together with the
//! event's tags; partial updates likewise touch all three tables atomically.

use std::time::Duration;

use bulletin_core::lifecycle::EventStatus;
use bulletin_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::error::{StoreError, StoreResult};
use crate::models::announcement_body::AnnouncementBody;
use crate::models::event::{CreateEvent, Event, EventDetails, EventListFilter, UpdateEvent};
use crate::repositories::{PublishAuditRepo, TagRepo};
use crate::tx::with_deadline;
use crate::update::{assignments, build_event_update};

/// Column list for `events` queries.
const COLUMNS: &str = "id, title, summary, body_id, created_by, status, scheduled_at, \
    created_at, updated_at";

/// Column list for `events` aliased as `e` (used in JOIN queries).
const ALIASED_COLUMNS: &str = "e.id, e.title, e.summary, e.body_id, e.created_by, e.status, \
    e.scheduled_at, e.created_at, e.updated_at";

/// Column list for `announcement_bodies` queries.
const BODY_COLUMNS: &str = "id, content, attachments, created_at, updated_at";

pub struct EventRepo;

impl EventRepo {
    /// Create an event with its body and tags.
    ///
    /// Body, event and tag rows are inserted in one transaction bounded by
    /// `deadline`. After commit the event is re-read so the returned
    /// snapshot carries the database-computed defaults.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEvent,
        deadline: Duration,
    ) -> StoreResult<Event> {
        let validated = input.validate()?;

        let event_id = with_deadline(deadline, async {
            let mut tx = pool.begin().await?;

            let body_id: DbId = sqlx::query_scalar(
                "INSERT INTO announcement_bodies (content, attachments) VALUES ($1, $2) RETURNING id",
            )
            .bind(&input.content)
            .bind(Json(&input.attachments))
            .fetch_one(&mut *tx)
            .await?;

            let event_id: DbId = sqlx::query_scalar(
                "INSERT INTO events (title, summary, body_id, created_by, status, scheduled_at) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING id",
            )
            .bind(&input.title)
            .bind(&input.summary)
            .bind(body_id)
            .bind(input.created_by)
            .bind(validated.status.as_str())
            .bind(input.scheduled_at)
            .fetch_one(&mut *tx)
            .await?;

            TagRepo::insert_all(&mut tx, event_id, &validated.tags).await?;

            tx.commit().await?;
            tracing::info!(event_id, body_id, tags = validated.tags.len(), "Event created");
            Ok::<DbId, StoreError>(event_id)
        })
        .await?;

        Self::find_by_id(pool, event_id)
            .await?
            .ok_or_else(|| StoreError::event_not_found(event_id))
    }

    /// Find an event by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Assemble an event with its body, tags and publish history.
    ///
    /// The event and body reads are strict. Tags and audit history are
    /// best-effort: a failure there is logged and yields an empty list.
    pub async fn find_details(pool: &PgPool, id: DbId) -> StoreResult<EventDetails> {
        let event = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| StoreError::event_not_found(id))?;

        let body_query = format!("SELECT {BODY_COLUMNS} FROM announcement_bodies WHERE id = $1");
        let body = sqlx::query_as::<_, AnnouncementBody>(&body_query)
            .bind(event.body_id)
            .fetch_optional(pool)
            .await?;

        let tags = TagRepo::list_for_event(pool, id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(event_id = id, error = %e, "Failed to load event tags");
                Vec::new()
            });

        let audit = PublishAuditRepo::list_for_event(pool, id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(event_id = id, error = %e, "Failed to load publish audit");
                Vec::new()
            });

        Ok(EventDetails {
            event,
            body,
            tags,
            audit,
        })
    }

    /// Apply a partial update. Only `Some` fields are written.
    ///
    /// `tags: Some(..)` replaces the full tag set; `content: Some(..)`
    /// rewrites the linked body in place. Any change refreshes the event's
    /// `updated_at`. Fails with `NotFound` if the event does not exist, and
    /// with `Timeout` if the transaction outlives `deadline`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
        deadline: Duration,
    ) -> StoreResult<()> {
        let tags = input.validate()?;

        with_deadline(deadline, async {
            let mut tx = pool.begin().await?;

            let body_id: DbId = sqlx::query_scalar("SELECT body_id FROM events WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| StoreError::event_not_found(id))?;

            if input.is_empty() {
                return Ok(());
            }

            let assignments = assignments(input);
            let mut update = build_event_update(id, &assignments);
            update.build().execute(&mut *tx).await?;

            if let Some(content) = &input.content {
                sqlx::query(
                    "UPDATE announcement_bodies SET content = $1, updated_at = NOW() WHERE id = $2",
                )
                .bind(content)
                .bind(body_id)
                .execute(&mut *tx)
                .await?;
            }

            if let Some(tags) = &tags {
                TagRepo::replace_all(&mut tx, id, tags).await?;
            }

            tx.commit().await?;
            tracing::info!(
                event_id = id,
                columns = assignments.len(),
                content = input.content.is_some(),
                tags = tags.as_ref().map(Vec::len),
                "Event updated"
            );
            Ok::<(), StoreError>(())
        })
        .await
    }

    /// List events newest-scheduled first, one page at a time.
    ///
    /// With a channel filter, an event is kept when the channel of its most
    /// recent audit row matches, or when it has no audit rows at all.
    pub async fn list_paged(
        pool: &PgPool,
        filter: &EventListFilter,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {ALIASED_COLUMNS} FROM events e \
             LEFT JOIN LATERAL ( \
                 SELECT p.channel FROM publish_audit p \
                 WHERE p.event_id = e.id \
                 ORDER BY p.performed_at DESC, p.id DESC \
                 LIMIT 1 \
             ) latest ON TRUE \
             WHERE TRUE"
        ));

        if let Some(channel) = filter.channel.as_deref().filter(|c| !c.is_empty()) {
            qb.push(" AND (latest.channel = ")
                .push_bind(channel)
                .push(" OR latest.channel IS NULL)");
        }
        if let Some(since) = filter.since {
            qb.push(" AND e.scheduled_at >= ").push_bind(since);
        }

        qb.push(" ORDER BY e.scheduled_at DESC NULLS LAST, e.id DESC LIMIT ")
            .push_bind(filter.page.limit())
            .push(" OFFSET ")
            .push_bind(filter.page.offset());

        qb.build_query_as::<Event>().fetch_all(pool).await
    }

    // -----------------------------------------------------------------------
    // Transaction-scoped helpers (used by the lifecycle engine)
    // -----------------------------------------------------------------------

    /// Read an event inside an open transaction.
    pub async fn find_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Set an event's status inside an open transaction.
    pub async fn set_status(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        status: EventStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE events SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
