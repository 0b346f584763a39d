//! Hash-chained log storage
//!
//! Append-only; the schema rejects UPDATE and DELETE on both log tables.
//! Appends run on the caller's connection, inside the caller's transaction,
//! so the engine write lock also serializes sequence allocation.

use sqlx::{Connection, SqliteConnection};
use tracing::error;

use shared::models::{AssignmentLog, QueueLog};

use super::chain::{GENESIS_HASH, assignment_log_hash, queue_log_hash};
use super::types::{AssignmentLogInput, QueueLogInput};
use crate::db::repository::{RepoResult, assignment_log, queue_log};
use crate::error::EngineError;

fn next_link(last: Option<(i64, String)>) -> (i64, String) {
    match last {
        Some((sequence, hash)) => (sequence + 1, hash),
        None => (1, GENESIS_HASH.to_string()),
    }
}

/// Append one queue log row
///
/// 1. Read the newest sequence and hash
/// 2. Hash the new row
/// 3. Insert it
pub async fn append_queue_log(
    conn: &mut SqliteConnection,
    input: QueueLogInput,
    now: i64,
) -> RepoResult<QueueLog> {
    let (sequence, prev_hash) = next_link(queue_log::last_link(conn).await?);

    let mut log = QueueLog {
        id: 0,
        sequence,
        queue_entry_id: input.queue_entry_id,
        action: input.action,
        old_status: input.old_status,
        new_status: input.new_status,
        remarks: input.remarks,
        performed_by: input.performed_by,
        created_at: now,
        prev_hash,
        curr_hash: String::new(),
    };
    log.curr_hash = queue_log_hash(&log);
    log.id = queue_log::insert(conn, &log).await?;
    Ok(log)
}

/// Append one assignment log row
pub async fn append_assignment_log(
    conn: &mut SqliteConnection,
    input: AssignmentLogInput,
    now: i64,
) -> RepoResult<AssignmentLog> {
    let (sequence, prev_hash) = next_link(assignment_log::last_link(conn).await?);

    let mut log = AssignmentLog {
        id: 0,
        sequence,
        schedule_id: input.schedule_id,
        station_id: input.station_id,
        employee_id: input.employee_id,
        action: input.action,
        details: input.details.to_string(),
        performed_by: input.performed_by,
        created_at: now,
        prev_hash,
        curr_hash: String::new(),
    };
    log.curr_hash = assignment_log_hash(&log);
    log.id = assignment_log::insert(conn, &log).await?;
    Ok(log)
}

/// Best-effort queue log append
///
/// Runs in a savepoint. On failure the savepoint is rolled back, the error
/// is reported as an integrity error and the caller's transaction goes on.
pub async fn record_queue_log(
    conn: &mut SqliteConnection,
    input: QueueLogInput,
    now: i64,
) -> Option<QueueLog> {
    let entry_id = input.queue_entry_id;
    let mut savepoint = match conn.begin().await {
        Ok(sp) => sp,
        Err(e) => {
            report_failure("queue_log", entry_id, e.into());
            return None;
        }
    };

    match append_queue_log(&mut savepoint, input, now).await {
        Ok(log) => match savepoint.commit().await {
            Ok(()) => Some(log),
            Err(e) => {
                report_failure("queue_log", entry_id, e.into());
                None
            }
        },
        Err(e) => {
            if let Err(rb) = savepoint.rollback().await {
                error!(error = %rb, "Failed to roll back audit savepoint");
            }
            report_failure("queue_log", entry_id, e);
            None
        }
    }
}

/// Best-effort assignment log append, same policy as [`record_queue_log`]
pub async fn record_assignment_log(
    conn: &mut SqliteConnection,
    input: AssignmentLogInput,
    now: i64,
) -> Option<AssignmentLog> {
    let schedule_id = input.schedule_id;
    let mut savepoint = match conn.begin().await {
        Ok(sp) => sp,
        Err(e) => {
            report_failure("assignment_log", schedule_id, e.into());
            return None;
        }
    };

    match append_assignment_log(&mut savepoint, input, now).await {
        Ok(log) => match savepoint.commit().await {
            Ok(()) => Some(log),
            Err(e) => {
                report_failure("assignment_log", schedule_id, e.into());
                None
            }
        },
        Err(e) => {
            if let Err(rb) = savepoint.rollback().await {
                error!(error = %rb, "Failed to roll back audit savepoint");
            }
            report_failure("assignment_log", schedule_id, e);
            None
        }
    }
}

fn report_failure(table: &'static str, subject_id: i64, cause: crate::db::repository::RepoError) {
    let err = EngineError::Integrity(format!("{table} append failed for {subject_id}: {cause}"));
    error!(table, subject_id, code = %err.code(), error = %err, "Audit append failed; transition kept");
}
