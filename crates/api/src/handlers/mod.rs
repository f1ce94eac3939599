//! Request handlers.
//!
//! Handlers delegate to the repositories in `bulletin_db` or to the
//! lifecycle engine and map errors via [`AppError`](crate::error::AppError).

pub mod events;
pub mod tags;
pub mod users;
