//! Announcement lifecycle: moderation, broadcast fanout and channel delivery.
//!
//! - [`LifecycleEngine`] enforces the status state machine and writes the
//!   publish audit trail, one transaction per operation.
//! - [`delivery`] holds the per-channel delivery capabilities the engine
//!   fans out to.

pub mod delivery;
pub mod engine;

pub use delivery::{ChannelDelivery, DeliveryError, DeliveryRegistry};
pub use engine::LifecycleEngine;
