//! Integration tests for the event store.
//!
//! Exercises the repository layer against a real database:
//! - Create with body and tags, then read back the details
//! - Partial updates (scalar fields, content, tag replacement)
//! - Paged listing with channel and `since` filters
//! - Tag usage and suggestion queries

use assert_matches::assert_matches;
use bulletin_core::error::CoreError;
use bulletin_core::pagination::PageRequest;
use bulletin_db::models::event::{CreateEvent, EventListFilter, UpdateEvent};
use bulletin_db::models::publish_audit::NewPublishAudit;
use bulletin_db::repositories::{EventRepo, PublishAuditRepo, TagRepo, UserRepo};
use bulletin_db::StoreError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TX_DEADLINE: std::time::Duration = std::time::Duration::from_secs(10);

fn new_event(title: &str) -> CreateEvent {
    CreateEvent {
        title: title.to_string(),
        summary: None,
        content: format!("{title} body"),
        attachments: vec![],
        created_by: 1,
        status: None,
        scheduled_at: None,
        tags: vec![],
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap()
}

async fn record_audit(pool: &PgPool, event_id: i64, action: &str, channel: &str) {
    let mut tx = pool.begin().await.unwrap();
    PublishAuditRepo::insert(
        &mut tx,
        &NewPublishAudit {
            event_id,
            action,
            performed_by: 9,
            channel,
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
}

fn sorted_tags(details: &bulletin_db::models::event::EventDetails) -> Vec<String> {
    let mut tags: Vec<String> = details.tags.iter().map(|t| t.tag.clone()).collect();
    tags.sort();
    tags
}

// ---------------------------------------------------------------------------
// Create / details
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_then_details(pool: PgPool) {
    let input = CreateEvent {
        summary: Some("Office closed".to_string()),
        attachments: vec!["calendar.pdf".to_string()],
        scheduled_at: Some(base_time()),
        tags: vec!["hr".to_string(), " holiday ".to_string()],
        ..new_event("Holiday Notice")
    };

    let event = EventRepo::create(&pool, &input, TX_DEADLINE).await.unwrap();
    assert_eq!(event.title, "Holiday Notice");
    assert_eq!(event.status, "draft");
    assert_eq!(event.scheduled_at, Some(base_time()));

    let details = EventRepo::find_details(&pool, event.id).await.unwrap();
    let body = details.body.as_ref().expect("body row");
    assert_eq!(body.id, event.body_id);
    assert_eq!(body.content, "Holiday Notice body");
    assert_eq!(body.attachments.0, vec!["calendar.pdf".to_string()]);
    assert_eq!(sorted_tags(&details), vec!["holiday", "hr"]);
    assert!(details.audit.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_explicit_status(pool: PgPool) {
    let input = CreateEvent {
        status: Some("approved".to_string()),
        ..new_event("Pre-approved")
    };
    let event = EventRepo::create(&pool, &input, TX_DEADLINE).await.unwrap();
    assert_eq!(event.status, "approved");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_blank_title_without_writing(pool: PgPool) {
    let input = CreateEvent {
        title: "   ".to_string(),
        ..new_event("x")
    };
    let err = EventRepo::create(&pool, &input, TX_DEADLINE).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));

    let bodies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM announcement_bodies")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(bodies, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_details_of_missing_event(pool: PgPool) {
    let err = EventRepo::find_details(&pool, 999_999).await.unwrap_err();
    assert_matches!(
        err,
        StoreError::Core(CoreError::NotFound { entity: "Event", id: 999_999 })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_details_include_audit_in_order(pool: PgPool) {
    let event = EventRepo::create(&pool, &new_event("Audited"), TX_DEADLINE).await.unwrap();
    record_audit(&pool, event.id, "broadcast", "push").await;
    record_audit(&pool, event.id, "broadcast", "email").await;

    let details = EventRepo::find_details(&pool, event.id).await.unwrap();
    let channels: Vec<&str> = details.audit.iter().map(|a| a.channel.as_str()).collect();
    assert_eq!(channels, vec!["push", "email"]);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_scalar_fields(pool: PgPool) {
    let event = EventRepo::create(&pool, &new_event("Draft title"), TX_DEADLINE).await.unwrap();

    let update = UpdateEvent {
        title: Some("Final title".to_string()),
        scheduled_at: Some(base_time()),
        ..Default::default()
    };
    EventRepo::update(&pool, event.id, &update, TX_DEADLINE).await.unwrap();

    let updated = EventRepo::find_by_id(&pool, event.id).await.unwrap().unwrap();
    assert_eq!(updated.title, "Final title");
    assert_eq!(updated.scheduled_at, Some(base_time()));
    assert!(updated.summary.is_none());
    assert!(updated.updated_at >= event.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_content_rewrites_body(pool: PgPool) {
    let event = EventRepo::create(&pool, &new_event("Body"), TX_DEADLINE).await.unwrap();

    let update = UpdateEvent {
        content: Some("Rewritten".to_string()),
        ..Default::default()
    };
    EventRepo::update(&pool, event.id, &update, TX_DEADLINE).await.unwrap();

    let details = EventRepo::find_details(&pool, event.id).await.unwrap();
    let body = details.body.unwrap();
    assert_eq!(body.id, event.body_id);
    assert_eq!(body.content, "Rewritten");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_tag_set(pool: PgPool) {
    let input = CreateEvent {
        tags: vec!["a".to_string(), "b".to_string()],
        ..new_event("Tagged")
    };
    let event = EventRepo::create(&pool, &input, TX_DEADLINE).await.unwrap();

    let update = UpdateEvent {
        tags: Some(vec!["b".to_string(), "c".to_string()]),
        ..Default::default()
    };
    EventRepo::update(&pool, event.id, &update, TX_DEADLINE).await.unwrap();

    let details = EventRepo::find_details(&pool, event.id).await.unwrap();
    assert_eq!(sorted_tags(&details), vec!["b", "c"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_empty_tags_clears_and_absent_tags_keep(pool: PgPool) {
    let input = CreateEvent {
        tags: vec!["keep".to_string()],
        ..new_event("Tagged")
    };
    let event = EventRepo::create(&pool, &input, TX_DEADLINE).await.unwrap();

    let rename = UpdateEvent {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    EventRepo::update(&pool, event.id, &rename, TX_DEADLINE).await.unwrap();
    let details = EventRepo::find_details(&pool, event.id).await.unwrap();
    assert_eq!(sorted_tags(&details), vec!["keep"]);

    let clear = UpdateEvent {
        tags: Some(vec![]),
        ..Default::default()
    };
    EventRepo::update(&pool, event.id, &clear, TX_DEADLINE).await.unwrap();
    let details = EventRepo::find_details(&pool, event.id).await.unwrap();
    assert!(details.tags.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_event(pool: PgPool) {
    let update = UpdateEvent {
        title: Some("Nope".to_string()),
        ..Default::default()
    };
    let err = EventRepo::update(&pool, 424_242, &update, TX_DEADLINE).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { .. }));

    let err = EventRepo::update(&pool, 424_242, &UpdateEvent::default(), TX_DEADLINE)
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_invalid_tag_changes_nothing(pool: PgPool) {
    let input = CreateEvent {
        tags: vec!["one".to_string()],
        ..new_event("Stable")
    };
    let event = EventRepo::create(&pool, &input, TX_DEADLINE).await.unwrap();

    let update = UpdateEvent {
        title: Some("Changed".to_string()),
        tags: Some(vec!["ok".to_string(), " ".to_string()]),
        ..Default::default()
    };
    let err = EventRepo::update(&pool, event.id, &update, TX_DEADLINE).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));

    let details = EventRepo::find_details(&pool, event.id).await.unwrap();
    assert_eq!(details.event.title, "Stable");
    assert_eq!(sorted_tags(&details), vec!["one"]);
}

// ---------------------------------------------------------------------------
// Atomicity and deadlines
// ---------------------------------------------------------------------------

async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Make the database refuse one tag value so a write fails after the body
/// and event rows have already been staged.
async fn refuse_tag(pool: &PgPool, tag: &str) {
    sqlx::query(&format!(
        "ALTER TABLE event_tags ADD CONSTRAINT ck_refused_tag CHECK (tag <> '{tag}')"
    ))
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_failing_on_tags_leaves_nothing(pool: PgPool) {
    refuse_tag(&pool, "refused").await;

    let input = CreateEvent {
        tags: vec!["ok".to_string(), "refused".to_string()],
        ..new_event("Half written")
    };
    let err = EventRepo::create(&pool, &input, TX_DEADLINE).await.unwrap_err();
    assert_matches!(err, StoreError::Transaction(sqlx::Error::Database(_)));

    assert_eq!(count_rows(&pool, "announcement_bodies").await, 0);
    assert_eq!(count_rows(&pool, "events").await, 0);
    assert_eq!(count_rows(&pool, "event_tags").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_failing_on_tags_keeps_prior_state(pool: PgPool) {
    let input = CreateEvent {
        tags: vec!["one".to_string()],
        ..new_event("Stable")
    };
    let event = EventRepo::create(&pool, &input, TX_DEADLINE).await.unwrap();
    refuse_tag(&pool, "refused").await;

    let update = UpdateEvent {
        title: Some("Changed".to_string()),
        content: Some("Changed body".to_string()),
        tags: Some(vec!["refused".to_string()]),
        ..Default::default()
    };
    let err = EventRepo::update(&pool, event.id, &update, TX_DEADLINE).await.unwrap_err();
    assert_matches!(err, StoreError::Transaction(sqlx::Error::Database(_)));

    let details = EventRepo::find_details(&pool, event.id).await.unwrap();
    assert_eq!(details.event.title, "Stable");
    assert_eq!(details.event.updated_at, event.updated_at);
    assert_eq!(details.body.as_ref().unwrap().content, "Stable body");
    assert_eq!(sorted_tags(&details), vec!["one"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_nul_byte_is_a_validation_error(pool: PgPool) {
    let input = CreateEvent {
        tags: vec!["ok".to_string(), "bad\0tag".to_string()],
        ..new_event("Nul")
    };
    let err = EventRepo::create(&pool, &input, TX_DEADLINE).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));
    assert_eq!(count_rows(&pool, "announcement_bodies").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_blocked_by_row_lock_times_out(pool: PgPool) {
    let event = EventRepo::create(&pool, &new_event("Locked"), TX_DEADLINE).await.unwrap();

    let mut holder = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM events WHERE id = $1 FOR UPDATE")
        .bind(event.id)
        .execute(&mut *holder)
        .await
        .unwrap();

    let update = UpdateEvent {
        title: Some("Never applied".to_string()),
        ..Default::default()
    };
    let deadline = std::time::Duration::from_millis(300);
    let err = EventRepo::update(&pool, event.id, &update, deadline).await.unwrap_err();
    assert_matches!(err, StoreError::Timeout(d) if d == deadline);

    holder.rollback().await.unwrap();

    let details = EventRepo::find_details(&pool, event.id).await.unwrap();
    assert_eq!(details.event.title, "Locked");
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Creates `count` events scheduled one hour apart; returns ids oldest first.
async fn seed_scheduled(pool: &PgPool, count: i64) -> Vec<i64> {
    let mut ids = Vec::new();
    for i in 0..count {
        let input = CreateEvent {
            scheduled_at: Some(base_time() + Duration::hours(i)),
            ..new_event(&format!("Event {i}"))
        };
        ids.push(EventRepo::create(pool, &input, TX_DEADLINE).await.unwrap().id);
    }
    ids
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_second_page(pool: PgPool) {
    let ids = seed_scheduled(&pool, 12).await;

    let filter = EventListFilter {
        page: PageRequest::new(Some(2), Some(5)),
        ..Default::default()
    };
    let page = EventRepo::list_paged(&pool, &filter).await.unwrap();

    // Newest first: ranks 6..=10 are ids[6], ids[5], ..., ids[2].
    let expected: Vec<i64> = ids.iter().rev().skip(5).take(5).copied().collect();
    let got: Vec<i64> = page.iter().map(|e| e.id).collect();
    assert_eq!(got, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_non_positive_page_is_first_page(pool: PgPool) {
    seed_scheduled(&pool, 4).await;

    let first = EventRepo::list_paged(
        &pool,
        &EventListFilter {
            page: PageRequest::new(Some(1), Some(2)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let zero = EventRepo::list_paged(
        &pool,
        &EventListFilter {
            page: PageRequest::new(Some(0), Some(2)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let first_ids: Vec<i64> = first.iter().map(|e| e.id).collect();
    let zero_ids: Vec<i64> = zero.iter().map(|e| e.id).collect();
    assert_eq!(first_ids, zero_ids);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_unscheduled_events_sort_last(pool: PgPool) {
    let unscheduled = EventRepo::create(&pool, &new_event("Someday"), TX_DEADLINE).await.unwrap();
    let ids = seed_scheduled(&pool, 2).await;

    let all = EventRepo::list_paged(&pool, &EventListFilter::default())
        .await
        .unwrap();
    let got: Vec<i64> = all.iter().map(|e| e.id).collect();
    assert_eq!(got, vec![ids[1], ids[0], unscheduled.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_channel_filter_uses_latest_audit(pool: PgPool) {
    let ids = seed_scheduled(&pool, 3).await;
    let (switched, push_only, never) = (ids[0], ids[1], ids[2]);

    record_audit(&pool, switched, "broadcast", "push").await;
    record_audit(&pool, switched, "broadcast", "email").await;
    record_audit(&pool, push_only, "broadcast", "push").await;

    let by_channel = |channel: &str| EventListFilter {
        channel: Some(channel.to_string()),
        ..Default::default()
    };

    let email = EventRepo::list_paged(&pool, &by_channel("email")).await.unwrap();
    let email_ids: Vec<i64> = email.iter().map(|e| e.id).collect();
    assert_eq!(email_ids, vec![never, switched]);

    let push = EventRepo::list_paged(&pool, &by_channel("push")).await.unwrap();
    let push_ids: Vec<i64> = push.iter().map(|e| e.id).collect();
    assert_eq!(push_ids, vec![never, push_only]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_since_filter(pool: PgPool) {
    let ids = seed_scheduled(&pool, 5).await;
    EventRepo::create(&pool, &new_event("Unscheduled"), TX_DEADLINE).await.unwrap();

    let filter = EventListFilter {
        since: Some(base_time() + Duration::hours(3)),
        ..Default::default()
    };
    let events = EventRepo::list_paged(&pool, &filter).await.unwrap();
    let got: Vec<i64> = events.iter().map(|e| e.id).collect();
    assert_eq!(got, vec![ids[4], ids[3]]);
}

// ---------------------------------------------------------------------------
// Tags and users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_usage_and_suggest(pool: PgPool) {
    for tags in [
        vec!["Holiday", "hr"],
        vec!["holiday", "health"],
        vec!["Holiday", "100%_done"],
    ] {
        let input = CreateEvent {
            tags: tags.into_iter().map(String::from).collect(),
            ..new_event("Tagged")
        };
        EventRepo::create(&pool, &input, TX_DEADLINE).await.unwrap();
    }

    let usage = TagRepo::list_usage(&pool).await.unwrap();
    assert_eq!(usage[0].tag, "Holiday");
    assert_eq!(usage[0].usage_count, 2);
    assert_eq!(usage.len(), 5);

    let suggestions = TagRepo::suggest(&pool, "HO", None).await.unwrap();
    let tags: Vec<&str> = suggestions.iter().map(|s| s.tag.as_str()).collect();
    assert_eq!(tags, vec!["Holiday", "holiday"]);

    let limited = TagRepo::suggest(&pool, "h", Some(2)).await.unwrap();
    assert_eq!(limited.len(), 2);

    let literal = TagRepo::suggest(&pool, "100%", None).await.unwrap();
    assert_eq!(literal.len(), 1);
    let wildcard = TagRepo::suggest(&pool, "%", None).await.unwrap();
    assert!(wildcard.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_users_list(pool: PgPool) {
    sqlx::query("INSERT INTO users (display_name, email) VALUES ('Ada', 'ada@x.io'), ('Lin', NULL)")
        .execute(&pool)
        .await
        .unwrap();

    let users = UserRepo::list(&pool).await.unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.display_name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Lin"]);
}
