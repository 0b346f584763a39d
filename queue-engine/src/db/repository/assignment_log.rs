//! Assignment Log Repository (append-only)

use super::RepoResult;
use shared::models::AssignmentLog;
use sqlx::SqliteConnection;

const COLUMNS: &str = "id, sequence, schedule_id, station_id, employee_id, action, details, performed_by, created_at, prev_hash, curr_hash";

/// Sequence and hash of the newest row
pub async fn last_link(conn: &mut SqliteConnection) -> RepoResult<Option<(i64, String)>> {
    let last = sqlx::query_as::<_, (i64, String)>(
        "SELECT sequence, curr_hash FROM assignment_log ORDER BY sequence DESC LIMIT 1",
    )
    .fetch_optional(&mut *conn)
    .await?;
    Ok(last)
}

/// Insert a fully hashed row; `log.id` is ignored
pub async fn insert(conn: &mut SqliteConnection, log: &AssignmentLog) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO assignment_log (sequence, schedule_id, station_id, employee_id, action, details, performed_by, created_at, prev_hash, curr_hash) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) RETURNING id",
    )
    .bind(log.sequence)
    .bind(log.schedule_id)
    .bind(log.station_id)
    .bind(log.employee_id)
    .bind(log.action)
    .bind(&log.details)
    .bind(log.performed_by)
    .bind(log.created_at)
    .bind(&log.prev_hash)
    .bind(&log.curr_hash)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Changes to one schedule, oldest first
pub async fn find_by_schedule(conn: &mut SqliteConnection, schedule_id: i64) -> RepoResult<Vec<AssignmentLog>> {
    let logs = sqlx::query_as::<_, AssignmentLog>(&format!(
        "SELECT {COLUMNS} FROM assignment_log WHERE schedule_id = ? ORDER BY sequence"
    ))
    .bind(schedule_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(logs)
}

/// Whole chain in sequence order
pub async fn find_all(conn: &mut SqliteConnection) -> RepoResult<Vec<AssignmentLog>> {
    let logs = sqlx::query_as::<_, AssignmentLog>(&format!("SELECT {COLUMNS} FROM assignment_log ORDER BY sequence"))
        .fetch_all(&mut *conn)
        .await?;
    Ok(logs)
}
