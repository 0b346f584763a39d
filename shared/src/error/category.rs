//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Station errors
/// - 2xxx: Assignment errors
/// - 3xxx: Queue errors
/// - 4xxx: Audit errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Station errors (1xxx)
    Station,
    /// Assignment errors (2xxx)
    Assignment,
    /// Queue errors (3xxx)
    Queue,
    /// Audit errors (4xxx)
    Audit,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Station,
            2000..3000 => Self::Assignment,
            3000..4000 => Self::Queue,
            4000..5000 => Self::Audit,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Station => "station",
            Self::Assignment => "assignment",
            Self::Queue => "queue",
            Self::Audit => "audit",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
