use std::time::Duration;

use bulletin_core::error::CoreError;

/// Error type for store and lifecycle operations.
///
/// Every variant implies the surrounding transaction was rolled back.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain rule rejected the operation (not found, validation,
    /// precondition, delivery).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The database failed mid-transaction.
    #[error("Transaction failed: {0}")]
    Transaction(#[from] sqlx::Error),

    /// The transaction did not finish before its deadline.
    #[error("Transaction exceeded its deadline of {0:?}")]
    Timeout(Duration),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn event_not_found(id: bulletin_core::types::DbId) -> Self {
        Self::Core(CoreError::NotFound { entity: "Event", id })
    }
}
