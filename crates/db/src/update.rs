//! Typed partial-update builder for the `events` table.
//!
//! The set of assignable columns is closed: only the variants of
//! [`EventAssignment`] can appear in the generated `SET` clause, and every
//! value is sent as a bound parameter.

use bulletin_core::types::{DbId, Timestamp};
use sqlx::{Postgres, QueryBuilder};

use crate::models::event::UpdateEvent;

/// One column assignment on `events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAssignment<'a> {
    Title(&'a str),
    Summary(&'a str),
    ScheduledAt(Timestamp),
}

impl EventAssignment<'_> {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Summary(_) => "summary",
            Self::ScheduledAt(_) => "scheduled_at",
        }
    }
}

/// Collect the scalar assignments present in `input`.
pub fn assignments(input: &UpdateEvent) -> Vec<EventAssignment<'_>> {
    let mut out = Vec::with_capacity(3);
    if let Some(title) = input.title.as_deref() {
        out.push(EventAssignment::Title(title));
    }
    if let Some(summary) = input.summary.as_deref() {
        out.push(EventAssignment::Summary(summary));
    }
    if let Some(scheduled_at) = input.scheduled_at {
        out.push(EventAssignment::ScheduledAt(scheduled_at));
    }
    out
}

/// Build `UPDATE events SET ..., updated_at = NOW() WHERE id = $n`.
///
/// `updated_at` is always refreshed, so an empty assignment list yields a
/// pure touch of the row.
pub fn build_event_update<'a>(
    event_id: DbId,
    assignments: &[EventAssignment<'a>],
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE events SET ");
    {
        let mut set = qb.separated(", ");
        for assignment in assignments {
            set.push(assignment.column());
            set.push_unseparated(" = ");
            match *assignment {
                EventAssignment::Title(v) | EventAssignment::Summary(v) => {
                    set.push_bind_unseparated(v);
                }
                EventAssignment::ScheduledAt(v) => {
                    set.push_bind_unseparated(v);
                }
            }
        }
        set.push("updated_at = NOW()");
    }
    qb.push(" WHERE id = ").push_bind(event_id);
    qb
}
