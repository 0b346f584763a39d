//! Queue Log Repository (append-only)

use super::RepoResult;
use chrono::NaiveDate;
use shared::models::{QueueLog, QueueStatus};
use sqlx::SqliteConnection;

const COLUMNS: &str = "id, sequence, queue_entry_id, action, old_status, new_status, remarks, performed_by, created_at, prev_hash, curr_hash";

/// Sequence and hash of the newest row
pub async fn last_link(conn: &mut SqliteConnection) -> RepoResult<Option<(i64, String)>> {
    let last = sqlx::query_as::<_, (i64, String)>(
        "SELECT sequence, curr_hash FROM queue_log ORDER BY sequence DESC LIMIT 1",
    )
    .fetch_optional(&mut *conn)
    .await?;
    Ok(last)
}

/// Insert a fully hashed row; `log.id` is ignored
pub async fn insert(conn: &mut SqliteConnection, log: &QueueLog) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO queue_log (sequence, queue_entry_id, action, old_status, new_status, remarks, performed_by, created_at, prev_hash, curr_hash) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) RETURNING id",
    )
    .bind(log.sequence)
    .bind(log.queue_entry_id)
    .bind(log.action)
    .bind(log.old_status)
    .bind(log.new_status)
    .bind(log.remarks.as_deref())
    .bind(log.performed_by)
    .bind(log.created_at)
    .bind(&log.prev_hash)
    .bind(&log.curr_hash)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Audit trail of one entry, oldest first
pub async fn find_by_entry(conn: &mut SqliteConnection, queue_entry_id: i64) -> RepoResult<Vec<QueueLog>> {
    let logs = sqlx::query_as::<_, QueueLog>(&format!(
        "SELECT {COLUMNS} FROM queue_log WHERE queue_entry_id = ? ORDER BY sequence"
    ))
    .bind(queue_entry_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(logs)
}

/// Whole chain in sequence order
pub async fn find_all(conn: &mut SqliteConnection) -> RepoResult<Vec<QueueLog>> {
    let logs = sqlx::query_as::<_, QueueLog>(&format!("SELECT {COLUMNS} FROM queue_log ORDER BY sequence"))
        .fetch_all(&mut *conn)
        .await?;
    Ok(logs)
}

/// Entry whose status disagrees with its latest log row
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, sqlx::FromRow)]
pub struct StatusMismatch {
    pub entry_id: i64,
    pub entry_status: QueueStatus,
    pub logged_status: QueueStatus,
}

/// Entries (optionally of one queue day) with no log rows at all
pub async fn entries_without_logs(conn: &mut SqliteConnection, date: Option<NaiveDate>) -> RepoResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT e.id FROM queue_entry e WHERE (?1 IS NULL OR e.queue_date = ?1) \
         AND NOT EXISTS (SELECT 1 FROM queue_log l WHERE l.queue_entry_id = e.id) ORDER BY e.id",
    )
    .bind(date)
    .fetch_all(&mut *conn)
    .await?;
    Ok(ids)
}

/// Entries that have log rows but no `created` row
pub async fn entries_without_created(conn: &mut SqliteConnection, date: Option<NaiveDate>) -> RepoResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar(
        "SELECT e.id FROM queue_entry e WHERE (?1 IS NULL OR e.queue_date = ?1) \
         AND EXISTS (SELECT 1 FROM queue_log l WHERE l.queue_entry_id = e.id) \
         AND NOT EXISTS (SELECT 1 FROM queue_log l WHERE l.queue_entry_id = e.id AND l.action = 'created') ORDER BY e.id",
    )
    .bind(date)
    .fetch_all(&mut *conn)
    .await?;
    Ok(ids)
}

pub async fn status_mismatches(
    conn: &mut SqliteConnection,
    date: Option<NaiveDate>,
) -> RepoResult<Vec<StatusMismatch>> {
    let rows = sqlx::query_as::<_, StatusMismatch>(
        "SELECT e.id AS entry_id, e.status AS entry_status, l.new_status AS logged_status FROM queue_entry e \
         JOIN queue_log l ON l.id = (SELECT id FROM queue_log WHERE queue_entry_id = e.id ORDER BY sequence DESC LIMIT 1) \
         WHERE (?1 IS NULL OR e.queue_date = ?1) AND l.new_status <> e.status ORDER BY e.id",
    )
    .bind(date)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}
