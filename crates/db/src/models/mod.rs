//! Row models and input DTOs.

pub mod announcement_body;
pub mod event;
pub mod event_tag;
pub mod publish_audit;
pub mod user;
