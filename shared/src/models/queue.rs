//! Queue Entry Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Queue type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum QueueType {
    Triage,
    Consultation,
    Lab,
    Prescription,
    Billing,
    Document,
}

/// Priority level, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PriorityLevel {
    Normal,
    Priority,
    Emergency,
}

impl PriorityLevel {
    /// Numeric rank; higher is served first
    pub const fn rank(&self) -> i64 {
        match self {
            Self::Normal => 0,
            Self::Priority => 1,
            Self::Emergency => 2,
        }
    }
}

impl PartialOrd for PriorityLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Queue entry status
///
/// ```text
/// waiting → arrived → in_progress → done | skipped | no_show
///    │         │           │
///    └─────────┴───────────┴──→ cancelled
/// waiting → no_show (never checked in)
/// no_show → waiting (reinstate)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum QueueStatus {
    Waiting,
    Arrived,
    InProgress,
    Done,
    Skipped,
    NoShow,
    Cancelled,
}

impl QueueStatus {
    pub const ALL: [QueueStatus; 7] = [
        QueueStatus::Waiting,
        QueueStatus::Arrived,
        QueueStatus::InProgress,
        QueueStatus::Done,
        QueueStatus::Skipped,
        QueueStatus::NoShow,
        QueueStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Arrived => "arrived",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Skipped => "skipped",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses keep their completion timestamps
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Done | Self::Skipped | Self::NoShow | Self::Cancelled
        )
    }

    /// Whether `self → next` is an edge of the lifecycle graph
    pub fn can_transition_to(&self, next: QueueStatus) -> bool {
        use QueueStatus::*;
        matches!(
            (self, next),
            (Waiting, Arrived)
                | (Waiting | Arrived, InProgress)
                | (InProgress, Done | Skipped)
                | (Waiting | InProgress, NoShow)
                | (Waiting | Arrived | InProgress, Cancelled)
                | (NoShow, Waiting)
        )
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queue entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct QueueEntry {
    pub id: i64,
    pub visit_id: i64,
    pub appointment_id: Option<i64>,
    pub patient_id: i64,
    pub service_id: i64,
    pub station_id: i64,
    pub queue_type: QueueType,
    /// Day the entry is queued for
    pub queue_date: NaiveDate,
    /// Slot label (`08A`, `12N`, `01P`, `UNS`); `None` outside the primary facility
    pub time_slot: Option<String>,
    /// Sequence within (`queue_date`, `time_slot`)
    pub queue_number: Option<i64>,
    /// `DDMMYY-SLOT-SEQ`
    pub queue_code: Option<String>,
    pub priority_level: PriorityLevel,
    pub status: QueueStatus,
    pub time_in: i64,
    pub time_started: Option<i64>,
    pub time_completed: Option<i64>,
    /// Minutes from `time_in` to `time_started`
    pub waiting_time: Option<i64>,
    /// Minutes from `time_in` to `time_completed`
    pub turnaround_time: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create queue entry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntryCreate {
    /// Walk-ins have no appointment
    pub appointment_id: Option<i64>,
    pub patient_id: i64,
    pub service_id: i64,
    pub queue_type: QueueType,
    #[serde(default = "default_priority")]
    pub priority_level: PriorityLevel,
    /// `None` = patient-initiated
    pub performed_by: Option<i64>,
}

fn default_priority() -> PriorityLevel {
    PriorityLevel::Normal
}

/// Per-status counts for one station and day
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub waiting: i64,
    pub arrived: i64,
    pub in_progress: i64,
    pub done: i64,
    pub skipped: i64,
    pub no_show: i64,
    pub cancelled: i64,
}

impl StatusCounts {
    pub fn add(&mut self, status: QueueStatus, n: i64) {
        let slot = match status {
            QueueStatus::Waiting => &mut self.waiting,
            QueueStatus::Arrived => &mut self.arrived,
            QueueStatus::InProgress => &mut self.in_progress,
            QueueStatus::Done => &mut self.done,
            QueueStatus::Skipped => &mut self.skipped,
            QueueStatus::NoShow => &mut self.no_show,
            QueueStatus::Cancelled => &mut self.cancelled,
        };
        *slot += n;
    }

    pub fn total(&self) -> i64 {
        self.waiting
            + self.arrived
            + self.in_progress
            + self.done
            + self.skipped
            + self.no_show
            + self.cancelled
    }
}

/// Live statistics for one station's queue on one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueStats {
    pub station_id: i64,
    pub date: NaiveDate,
    pub counts: StatusCounts,
    /// Mean turnaround in minutes over entries that have one
    pub average_turnaround: Option<f64>,
    /// Entry `call-next` would pick now
    pub next_entry_id: Option<i64>,
    pub next_queue_number: Option<i64>,
    pub next_queue_code: Option<String>,
}
