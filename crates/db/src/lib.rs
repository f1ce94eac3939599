//! PostgreSQL persistence for announcement events.
//!
//! The pool is opened explicitly with [`create_pool`] and passed by
//! reference into every repository call; nothing here holds global state.
//! Callers close it with [`DbPool::close`](sqlx::Pool::close) on shutdown.

use sqlx::postgres::PgPoolOptions;

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod tx;
pub mod update;

pub use config::DbConfig;
pub use error::{StoreError, StoreResult};
pub use tx::with_deadline;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool sized and bounded by `config`.
///
/// Connections are pinged before being handed out so dead ones are evicted,
/// and acquiring a connection from an exhausted pool fails after
/// `acquire_timeout` instead of queueing forever.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .test_before_acquire(true)
        .connect_with(config.connect_options.clone())
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
