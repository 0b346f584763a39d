//! Queue Log Model (append-only, hash-chained)

use super::queue::QueueStatus;
use serde::{Deserialize, Serialize};

/// Queue log action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum QueueAction {
    Created,
    StatusChanged,
    Cancelled,
    Reinstated,
    Skipped,
    /// Station change; part of the log vocabulary, no engine operation emits it
    Moved,
}

impl QueueAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::StatusChanged => "status_changed",
            Self::Cancelled => "cancelled",
            Self::Reinstated => "reinstated",
            Self::Skipped => "skipped",
            Self::Moved => "moved",
        }
    }
}

/// One audit row for a queue entry transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct QueueLog {
    pub id: i64,
    /// Position in the chain, starting at 1
    pub sequence: i64,
    pub queue_entry_id: i64,
    pub action: QueueAction,
    pub old_status: Option<QueueStatus>,
    pub new_status: QueueStatus,
    pub remarks: Option<String>,
    /// `None` = patient-initiated
    pub performed_by: Option<i64>,
    pub created_at: i64,
    pub prev_hash: String,
    pub curr_hash: String,
}
