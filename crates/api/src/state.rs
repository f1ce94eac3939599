use std::sync::Arc;
use std::time::Duration;

use bulletin_lifecycle::LifecycleEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: bulletin_db::DbPool,
    /// Deadline for each event-store write transaction.
    pub tx_timeout: Duration,
    /// Moderation and broadcast engine.
    pub engine: Arc<LifecycleEngine>,
}
