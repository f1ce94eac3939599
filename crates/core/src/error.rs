use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A lifecycle rule forbids the requested operation in the current state.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// A delivery capability reported failure while broadcasting.
    #[error("Delivery to channel '{channel}' failed: {message}")]
    DeliveryFailed { channel: String, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
