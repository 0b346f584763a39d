//! Assignment Log Model (append-only, hash-chained)

use serde::{Deserialize, Serialize};

/// Assignment log action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum AssignmentAction {
    Assigned,
    Reactivated,
    Ended,
    Deactivated,
    Reassigned,
}

impl AssignmentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Reactivated => "reactivated",
            Self::Ended => "ended",
            Self::Deactivated => "deactivated",
            Self::Reassigned => "reassigned",
        }
    }
}

/// One audit row for an assignment change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AssignmentLog {
    pub id: i64,
    pub sequence: i64,
    pub schedule_id: i64,
    pub station_id: i64,
    pub employee_id: i64,
    pub action: AssignmentAction,
    /// JSON object describing the change
    pub details: String,
    pub performed_by: Option<i64>,
    pub created_at: i64,
    pub prev_hash: String,
    pub curr_hash: String,
}
