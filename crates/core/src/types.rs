//! Primitive aliases shared by every crate.

/// Row identifier. Every table keys on `BIGSERIAL`.
pub type DbId = i64;

/// Stored as `TIMESTAMPTZ`, handled in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
