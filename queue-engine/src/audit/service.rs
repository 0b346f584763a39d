//! Audit service
//!
//! Read-side of the two audit trails: chain verification and the integrity
//! check that cross-references queue entries against their logs.

use chrono::NaiveDate;
use tracing::{info, warn};

use super::chain::verify_records;
use super::types::{AuditChainVerification, AuditIntegrityReport, AuditLogKind};
use crate::core::EngineContext;
use crate::db::repository::{assignment_log, queue_log};
use crate::error::EngineResult;
use shared::models::{AssignmentLog, QueueLog};

#[derive(Clone)]
pub struct AuditService {
    ctx: EngineContext,
}

impl AuditService {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Verify the queue log chain from genesis
    pub async fn verify_queue_chain(&self) -> EngineResult<AuditChainVerification> {
        let mut conn = self.ctx.read().await?;
        let logs = queue_log::find_all(&mut conn).await?;
        Ok(verify_records(AuditLogKind::QueueLog, &logs))
    }

    /// Verify the assignment log chain from genesis
    pub async fn verify_assignment_chain(&self) -> EngineResult<AuditChainVerification> {
        let mut conn = self.ctx.read().await?;
        let logs = assignment_log::find_all(&mut conn).await?;
        Ok(verify_records(AuditLogKind::AssignmentLog, &logs))
    }

    /// Audit trail of one queue entry, oldest first
    pub async fn queue_history(&self, queue_entry_id: i64) -> EngineResult<Vec<QueueLog>> {
        let mut conn = self.ctx.read().await?;
        Ok(queue_log::find_by_entry(&mut conn, queue_entry_id).await?)
    }

    /// Change history of one assignment schedule, oldest first
    pub async fn assignment_history(&self, schedule_id: i64) -> EngineResult<Vec<AssignmentLog>> {
        let mut conn = self.ctx.read().await?;
        Ok(assignment_log::find_by_schedule(&mut conn, schedule_id).await?)
    }

    /// Cross-check queue entries (of one day, or all) against their trails
    ///
    /// Findings are logged at `warn` and returned; nothing is repaired.
    pub async fn integrity_check(&self, date: Option<NaiveDate>) -> EngineResult<AuditIntegrityReport> {
        let mut conn = self.ctx.read().await?;
        let entries_without_logs = queue_log::entries_without_logs(&mut conn, date).await?;
        let entries_without_created = queue_log::entries_without_created(&mut conn, date).await?;
        let status_mismatches = queue_log::status_mismatches(&mut conn, date).await?;
        let queue_logs = queue_log::find_all(&mut conn).await?;
        let assignment_logs = assignment_log::find_all(&mut conn).await?;
        drop(conn);

        let report = AuditIntegrityReport {
            date,
            entries_without_logs,
            entries_without_created,
            status_mismatches,
            queue_chain: verify_records(AuditLogKind::QueueLog, &queue_logs),
            assignment_chain: verify_records(AuditLogKind::AssignmentLog, &assignment_logs),
        };

        if report.is_clean() {
            info!(
                date = ?date,
                queue_logs = report.queue_chain.total_entries,
                assignment_logs = report.assignment_chain.total_entries,
                "Audit integrity check passed"
            );
        } else {
            warn!(
                date = ?date,
                without_logs = report.entries_without_logs.len(),
                without_created = report.entries_without_created.len(),
                status_mismatches = report.status_mismatches.len(),
                queue_chain_breaks = report.queue_chain.breaks.len(),
                assignment_chain_breaks = report.assignment_chain.breaks.len(),
                "Audit integrity check found issues"
            );
            for mismatch in &report.status_mismatches {
                warn!(
                    entry_id = mismatch.entry_id,
                    entry_status = %mismatch.entry_status,
                    logged_status = %mismatch.logged_status,
                    "Queue entry status disagrees with its audit trail"
                );
            }
            for brk in report.queue_chain.breaks.iter().chain(&report.assignment_chain.breaks) {
                warn!(sequence = brk.sequence, kind = ?brk.kind, "Audit chain break");
            }
        }

        Ok(report)
    }
}
