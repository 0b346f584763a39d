//! Audit types

use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{AssignmentAction, QueueAction, QueueStatus};

pub use crate::db::repository::queue_log::StatusMismatch;

/// Which hash chain a verification covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLogKind {
    QueueLog,
    AssignmentLog,
}

impl AuditLogKind {
    pub fn table(&self) -> &'static str {
        match self {
            Self::QueueLog => "queue_log",
            Self::AssignmentLog => "assignment_log",
        }
    }
}

/// What is wrong at a chain break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainBreakKind {
    /// `prev_hash` does not point at the previous row
    PrevHashMismatch,
    /// Stored hash differs from the recomputed one (row edited)
    HashMismatch,
    /// Sequence numbers are not contiguous (row removed)
    SequenceGap,
}

/// Chain break
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditChainBreak {
    pub sequence: i64,
    pub kind: ChainBreakKind,
    pub expected: String,
    pub actual: String,
}

/// Chain verification result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditChainVerification {
    pub log: AuditLogKind,
    pub total_entries: u64,
    pub chain_intact: bool,
    pub breaks: Vec<AuditChainBreak>,
}

/// Findings of the periodic integrity check
#[derive(Debug, Clone, Serialize)]
pub struct AuditIntegrityReport {
    /// Queue day checked; `None` = all days
    pub date: Option<NaiveDate>,
    /// Entries with no log rows at all
    pub entries_without_logs: Vec<i64>,
    /// Entries whose trail does not start with `created`
    pub entries_without_created: Vec<i64>,
    /// Entries whose status disagrees with the latest log row
    pub status_mismatches: Vec<StatusMismatch>,
    pub queue_chain: AuditChainVerification,
    pub assignment_chain: AuditChainVerification,
}

impl AuditIntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.entries_without_logs.is_empty()
            && self.entries_without_created.is_empty()
            && self.status_mismatches.is_empty()
            && self.queue_chain.chain_intact
            && self.assignment_chain.chain_intact
    }
}

/// Queue transition to record
#[derive(Debug, Clone)]
pub struct QueueLogInput {
    pub queue_entry_id: i64,
    pub action: QueueAction,
    pub old_status: Option<QueueStatus>,
    pub new_status: QueueStatus,
    pub remarks: Option<String>,
    pub performed_by: Option<i64>,
}

/// Assignment change to record
#[derive(Debug, Clone)]
pub struct AssignmentLogInput {
    pub schedule_id: i64,
    pub station_id: i64,
    pub employee_id: i64,
    pub action: AssignmentAction,
    pub details: serde_json::Value,
    pub performed_by: Option<i64>,
}
