//! Announcement lifecycle vocabulary and transition rules.
//!
//! ```text
//! draft    --moderate(approved, channel)--> approved
//! draft    --moderate(rejected)-----------> rejected
//! approved --moderate(approved, channel)--> approved   (adds a channel)
//! approved --broadcast()-----------------> approved
//! ```
//!
//! Statuses, actions and channels are persisted as plain text; the enums
//! here are the only place their spellings are defined.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Audit vocabulary
// ---------------------------------------------------------------------------

/// Audit action recorded when an event is approved for a channel.
pub const AUDIT_ACTION_BROADCAST: &str = "broadcast";

/// Audit action recorded when an event is rejected.
pub const AUDIT_ACTION_REJECTED: &str = "rejected";

/// Audit action recorded once per channel delivered during a broadcast.
pub const AUDIT_ACTION_BROADCAST_SUCCESSFUL: &str = "broadcast successful";

/// Channel recorded on rejection audit rows. Never matches a delivery channel.
pub const CHANNEL_NOT_SENDING: &str = "not sending";

// ---------------------------------------------------------------------------
// EventStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of an announcement event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Approved,
    Rejected,
}

impl EventStatus {
    pub const ALL: [EventStatus; 3] = [Self::Draft, Self::Approved, Self::Rejected];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid status '{s}'. Must be one of: draft, approved, rejected"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// A delivery medium an approved event can be broadcast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Push,
    Email,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Email => "email",
        }
    }

    /// Map a recorded channel string to a deliverable channel.
    ///
    /// Returns `None` for anything unrecognised (including
    /// [`CHANNEL_NOT_SENDING`]); such channels are skipped during broadcast.
    pub fn from_recorded(value: &str) -> Option<Self> {
        match value {
            "push" => Some(Self::Push),
            "email" => Some(Self::Email),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

/// Outcome requested by a moderator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl FromStr for ModerationAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approve),
            "rejected" => Ok(Self::Reject),
            other => Err(CoreError::Validation(format!(
                "Invalid action '{other}'. Must be 'approved' or 'rejected'"
            ))),
        }
    }
}

/// The writes a moderation performs: the new status plus one audit row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationPlan {
    pub action: ModerationAction,
    pub new_status: EventStatus,
    pub audit_action: &'static str,
    pub audit_channel: String,
}

/// Resolve a raw moderation request into the writes it implies.
///
/// Performs only input validation; the current status is checked later by
/// [`check_moderation_transition`] once the event has been read.
pub fn plan_moderation(action: &str, channel: Option<&str>) -> Result<ModerationPlan, CoreError> {
    let action: ModerationAction = action.parse()?;

    match action {
        ModerationAction::Approve => {
            let channel = channel
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| {
                    CoreError::Validation("channel required when approving".to_string())
                })?;
            Ok(ModerationPlan {
                action,
                new_status: EventStatus::Approved,
                audit_action: AUDIT_ACTION_BROADCAST,
                audit_channel: channel.to_string(),
            })
        }
        ModerationAction::Reject => Ok(ModerationPlan {
            action,
            new_status: EventStatus::Rejected,
            audit_action: AUDIT_ACTION_REJECTED,
            audit_channel: CHANNEL_NOT_SENDING.to_string(),
        }),
    }
}

/// Check that `action` is a legal move from `current`.
///
/// Drafts may be approved or rejected; approved events may only be
/// re-approved (to record an additional channel). Rejected events are final.
pub fn check_moderation_transition(
    current: EventStatus,
    action: ModerationAction,
) -> Result<(), CoreError> {
    match (current, action) {
        (EventStatus::Draft, _) | (EventStatus::Approved, ModerationAction::Approve) => Ok(()),
        (EventStatus::Approved, ModerationAction::Reject) => Err(CoreError::PreconditionFailed(
            "approved events cannot be rejected".to_string(),
        )),
        (EventStatus::Rejected, _) => Err(CoreError::PreconditionFailed(
            "rejected events cannot be moderated again".to_string(),
        )),
    }
}

/// Only approved events can be broadcast.
pub fn check_broadcastable(current: EventStatus) -> Result<(), CoreError> {
    if current == EventStatus::Approved {
        Ok(())
    } else {
        Err(CoreError::PreconditionFailed(
            "only approved events can be broadcast".to_string(),
        ))
    }
}
