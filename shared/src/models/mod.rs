//! Data models
//!
//! Shared between the queue engine and its callers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod appointment;
pub mod assignment;
pub mod assignment_log;
pub mod employee;
pub mod queue;
pub mod queue_log;
pub mod station;
pub mod visit;

// Re-exports
pub use appointment::*;
pub use assignment::*;
pub use assignment_log::*;
pub use employee::*;
pub use queue::*;
pub use queue_log::*;
pub use station::*;
pub use visit::*;
