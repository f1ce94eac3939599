//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an open transaction) as the first argument.

pub mod event_repo;
pub mod publish_audit_repo;
pub mod tag_repo;
pub mod user_repo;

pub use event_repo::EventRepo;
pub use publish_audit_repo::PublishAuditRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
