//! Shared domain vocabulary for the announcement service.
//!
//! This crate performs no database or network I/O. It defines the primitive
//! types, the error taxonomy, config parsing helpers, and the pure rules
//! (status transitions, channel parsing, pagination, input validation) used
//! by the `db`, `lifecycle` and `api` crates.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod pagination;
pub mod types;
pub mod validation;
