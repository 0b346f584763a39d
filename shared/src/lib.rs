//! Shared types for the queue engine
//!
//! Data models and the unified error-code system, usable by callers that
//! never touch the database. Enable the `db` feature for sqlx row mappings.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
