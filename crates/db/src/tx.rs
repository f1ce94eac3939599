//! Deadline enforcement for transactional work.

use std::future::Future;
use std::time::Duration;

use crate::error::{StoreError, StoreResult};

/// Run `operation` with an upper bound on its duration.
///
/// On expiry the future is dropped. Any `sqlx::Transaction` it owns is
/// dropped with it, which rolls the transaction back before the connection
/// returns to the pool.
pub async fn with_deadline<T, F>(deadline: Duration, operation: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(?deadline, "Transaction deadline exceeded, rolled back");
            Err(StoreError::Timeout(deadline))
        }
    }
}
