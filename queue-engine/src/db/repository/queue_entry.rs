//! Queue Entry Repository

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{PriorityLevel, QueueEntry, QueueStatus, QueueType};
use sqlx::SqliteConnection;

const COLUMNS: &str = "id, visit_id, appointment_id, patient_id, service_id, station_id, queue_type, queue_date, time_slot, queue_number, queue_code, priority_level, status, time_in, time_started, time_completed, waiting_time, turnaround_time, created_at, updated_at";

/// emergency > priority > normal, then earliest slot and lowest number within
/// it, then earliest arrival
const SERVICE_ORDER: &str = "CASE priority_level WHEN 'emergency' THEN 2 WHEN 'priority' THEN 1 ELSE 0 END DESC, \
     queue_number IS NULL, slot_order ASC, queue_number ASC, time_in ASC, id ASC";

/// Values for a new `waiting` entry
#[derive(Debug, Clone)]
pub struct NewQueueEntry {
    pub visit_id: i64,
    pub appointment_id: Option<i64>,
    pub patient_id: i64,
    pub service_id: i64,
    pub station_id: i64,
    pub queue_type: QueueType,
    pub queue_date: NaiveDate,
    pub time_slot: Option<String>,
    /// `TimeSlot::ordinal` of `time_slot`
    pub slot_order: Option<i64>,
    pub queue_number: Option<i64>,
    pub queue_code: Option<String>,
    pub priority_level: PriorityLevel,
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<QueueEntry>> {
    let entry = sqlx::query_as::<_, QueueEntry>(&format!("SELECT {COLUMNS} FROM queue_entry WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(entry)
}

pub async fn insert(conn: &mut SqliteConnection, data: &NewQueueEntry, now: i64) -> RepoResult<QueueEntry> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO queue_entry (visit_id, appointment_id, patient_id, service_id, station_id, queue_type, queue_date, time_slot, slot_order, queue_number, queue_code, priority_level, status, time_in, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 'waiting', ?13, ?13, ?13) RETURNING id",
    )
    .bind(data.visit_id)
    .bind(data.appointment_id)
    .bind(data.patient_id)
    .bind(data.service_id)
    .bind(data.station_id)
    .bind(data.queue_type)
    .bind(data.queue_date)
    .bind(data.time_slot.as_deref())
    .bind(data.slot_order)
    .bind(data.queue_number)
    .bind(data.queue_code.as_deref())
    .bind(data.priority_level)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create queue entry".into()))
}

/// The appointment's entry unless it was cancelled
pub async fn find_open_for_appointment(
    conn: &mut SqliteConnection,
    appointment_id: i64,
) -> RepoResult<Option<QueueEntry>> {
    let entry = sqlx::query_as::<_, QueueEntry>(&format!(
        "SELECT {COLUMNS} FROM queue_entry WHERE appointment_id = ? AND status <> 'cancelled' LIMIT 1"
    ))
    .bind(appointment_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(entry)
}

/// Non-cancelled entries holding a number in (date, slot)
pub async fn count_active_in_slot(conn: &mut SqliteConnection, date: NaiveDate, slot: &str) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM queue_entry WHERE queue_date = ?1 AND time_slot = ?2 AND status <> 'cancelled'",
    )
    .bind(date)
    .bind(slot)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}

/// Atomically advance the (date, slot) counter and return the new number
pub async fn next_slot_number(conn: &mut SqliteConnection, date: NaiveDate, slot: &str) -> RepoResult<i64> {
    let number: i64 = sqlx::query_scalar(
        "INSERT INTO queue_slot_counter (queue_date, time_slot, last_number) VALUES (?1, ?2, 1) \
         ON CONFLICT (queue_date, time_slot) DO UPDATE SET last_number = last_number + 1 RETURNING last_number",
    )
    .bind(date)
    .bind(slot)
    .fetch_one(&mut *conn)
    .await?;
    Ok(number)
}

/// Persist a transition computed by the caller
///
/// Guarded on the status the caller read, so a lost race updates nothing and
/// returns `false`.
pub async fn update_progress(
    conn: &mut SqliteConnection,
    entry: &QueueEntry,
    expected: QueueStatus,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE queue_entry SET status = ?1, time_started = ?2, time_completed = ?3, waiting_time = ?4, turnaround_time = ?5, updated_at = ?6 \
         WHERE id = ?7 AND status = ?8",
    )
    .bind(entry.status)
    .bind(entry.time_started)
    .bind(entry.time_completed)
    .bind(entry.waiting_time)
    .bind(entry.turnaround_time)
    .bind(entry.updated_at)
    .bind(entry.id)
    .bind(expected)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Entry `call-next` would serve at a station on a day
pub async fn next_candidate(
    conn: &mut SqliteConnection,
    station_id: i64,
    date: NaiveDate,
) -> RepoResult<Option<QueueEntry>> {
    let entry = sqlx::query_as::<_, QueueEntry>(&format!(
        "SELECT {COLUMNS} FROM queue_entry WHERE station_id = ?1 AND queue_date = ?2 AND status IN ('waiting', 'arrived') \
         ORDER BY {SERVICE_ORDER} LIMIT 1"
    ))
    .bind(station_id)
    .bind(date)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(entry)
}

/// A station's queue for a day in service order
pub async fn find_for_station(
    conn: &mut SqliteConnection,
    station_id: i64,
    date: NaiveDate,
    status: Option<QueueStatus>,
    limit: Option<i64>,
) -> RepoResult<Vec<QueueEntry>> {
    let entries = sqlx::query_as::<_, QueueEntry>(&format!(
        "SELECT {COLUMNS} FROM queue_entry WHERE station_id = ?1 AND queue_date = ?2 AND (?3 IS NULL OR status = ?3) \
         ORDER BY {SERVICE_ORDER} LIMIT ?4"
    ))
    .bind(station_id)
    .bind(date)
    .bind(status)
    .bind(limit.unwrap_or(-1))
    .fetch_all(&mut *conn)
    .await?;
    Ok(entries)
}

pub async fn status_counts(
    conn: &mut SqliteConnection,
    station_id: i64,
    date: NaiveDate,
) -> RepoResult<Vec<(QueueStatus, i64)>> {
    let rows = sqlx::query_as::<_, (QueueStatus, i64)>(
        "SELECT status, COUNT(*) FROM queue_entry WHERE station_id = ?1 AND queue_date = ?2 GROUP BY status",
    )
    .bind(station_id)
    .bind(date)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

/// Mean turnaround of completed (`done`) entries, in minutes
pub async fn average_turnaround(
    conn: &mut SqliteConnection,
    station_id: i64,
    date: NaiveDate,
) -> RepoResult<Option<f64>> {
    let avg: Option<f64> = sqlx::query_scalar(
        "SELECT AVG(turnaround_time) FROM queue_entry WHERE station_id = ?1 AND queue_date = ?2 AND status = 'done' AND turnaround_time IS NOT NULL",
    )
    .bind(station_id)
    .bind(date)
    .fetch_one(&mut *conn)
    .await?;
    Ok(avg)
}
