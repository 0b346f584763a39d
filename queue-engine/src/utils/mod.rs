//! Utilities: logging setup and business-time helpers

pub mod logger;
pub mod time;
