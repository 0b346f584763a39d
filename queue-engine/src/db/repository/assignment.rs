//! Assignment Schedule Repository
//!
//! Plain row access. Overlap and conflict rules live in `assignments`.

use super::{RepoError, RepoResult};
use chrono::{NaiveDate, NaiveTime};
use shared::models::{AssignmentSchedule, AssignmentType, ScheduleConflict};
use sqlx::SqliteConnection;

const COLUMNS: &str = "id, employee_id, station_id, start_date, end_date, shift_start, shift_end, assignment_type, is_active, assigned_by, assigned_at, updated_at";

/// Columns of [`ScheduleConflict`], joined with employee and station names
const CONFLICT_SELECT: &str = "SELECT s.id AS schedule_id, s.employee_id, e.name AS employee_name, s.station_id, st.name AS station_name, s.start_date, s.end_date, s.shift_start, s.shift_end \
     FROM assignment_schedule s JOIN employee e ON e.id = s.employee_id JOIN station st ON st.id = s.station_id";

/// Values for a new schedule row
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub employee_id: i64,
    pub station_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
    pub assignment_type: AssignmentType,
    pub assigned_by: Option<i64>,
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<AssignmentSchedule>> {
    let schedule = sqlx::query_as::<_, AssignmentSchedule>(&format!(
        "SELECT {COLUMNS} FROM assignment_schedule WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(schedule)
}

/// Row for the (employee, station, start date) tuple, active or not
pub async fn find_by_tuple(
    conn: &mut SqliteConnection,
    employee_id: i64,
    station_id: i64,
    start_date: NaiveDate,
) -> RepoResult<Option<AssignmentSchedule>> {
    let schedule = sqlx::query_as::<_, AssignmentSchedule>(&format!(
        "SELECT {COLUMNS} FROM assignment_schedule WHERE employee_id = ?1 AND station_id = ?2 AND start_date = ?3"
    ))
    .bind(employee_id)
    .bind(station_id)
    .bind(start_date)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(schedule)
}

/// Active schedules on a station that have not ended before `from`, earliest first
pub async fn find_active_for_station_from(
    conn: &mut SqliteConnection,
    station_id: i64,
    from: NaiveDate,
) -> RepoResult<Vec<AssignmentSchedule>> {
    let schedules = sqlx::query_as::<_, AssignmentSchedule>(&format!(
        "SELECT {COLUMNS} FROM assignment_schedule WHERE station_id = ?1 AND is_active = 1 AND (end_date IS NULL OR end_date >= ?2) \
         ORDER BY start_date, id"
    ))
    .bind(station_id)
    .bind(from)
    .fetch_all(&mut *conn)
    .await?;
    Ok(schedules)
}

/// Active schedules of an employee covering `date`, by shift start
pub async fn find_active_for_employee_on(
    conn: &mut SqliteConnection,
    employee_id: i64,
    date: NaiveDate,
) -> RepoResult<Vec<AssignmentSchedule>> {
    let schedules = sqlx::query_as::<_, AssignmentSchedule>(&format!(
        "SELECT {COLUMNS} FROM assignment_schedule WHERE employee_id = ?1 AND is_active = 1 AND start_date <= ?2 AND (end_date IS NULL OR end_date >= ?2) \
         ORDER BY shift_start, id"
    ))
    .bind(employee_id)
    .bind(date)
    .fetch_all(&mut *conn)
    .await?;
    Ok(schedules)
}

/// Every active schedule covering `date`
pub async fn find_active_on(conn: &mut SqliteConnection, date: NaiveDate) -> RepoResult<Vec<AssignmentSchedule>> {
    let schedules = sqlx::query_as::<_, AssignmentSchedule>(&format!(
        "SELECT {COLUMNS} FROM assignment_schedule WHERE is_active = 1 AND start_date <= ?1 AND (end_date IS NULL OR end_date >= ?1) \
         ORDER BY station_id, shift_start, id"
    ))
    .bind(date)
    .fetch_all(&mut *conn)
    .await?;
    Ok(schedules)
}

/// Full history of a station, newest first
pub async fn find_by_station(conn: &mut SqliteConnection, station_id: i64) -> RepoResult<Vec<AssignmentSchedule>> {
    let schedules = sqlx::query_as::<_, AssignmentSchedule>(&format!(
        "SELECT {COLUMNS} FROM assignment_schedule WHERE station_id = ? ORDER BY start_date DESC, id DESC"
    ))
    .bind(station_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(schedules)
}

/// Active schedules that could block a booking: on `station_id`, or held by `employee_id`
///
/// Date and shift overlap are decided by the caller.
pub async fn find_conflict_candidates(
    conn: &mut SqliteConnection,
    employee_id: i64,
    station_id: i64,
) -> RepoResult<Vec<ScheduleConflict>> {
    let rows = sqlx::query_as::<_, ScheduleConflict>(&format!(
        "{CONFLICT_SELECT} WHERE s.is_active = 1 AND (s.station_id = ?1 OR s.employee_id = ?2) ORDER BY s.start_date, s.id"
    ))
    .bind(station_id)
    .bind(employee_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

pub async fn insert(conn: &mut SqliteConnection, data: &NewSchedule, now: i64) -> RepoResult<AssignmentSchedule> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO assignment_schedule (employee_id, station_id, start_date, end_date, shift_start, shift_end, assignment_type, is_active, assigned_by, assigned_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9, ?9) RETURNING id",
    )
    .bind(data.employee_id)
    .bind(data.station_id)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(data.shift_start)
    .bind(data.shift_end)
    .bind(data.assignment_type)
    .bind(data.assigned_by)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create assignment schedule".into()))
}

/// Re-enable an inactive row with the new terms
pub async fn reactivate(
    conn: &mut SqliteConnection,
    id: i64,
    data: &NewSchedule,
    now: i64,
) -> RepoResult<AssignmentSchedule> {
    let rows = sqlx::query(
        "UPDATE assignment_schedule SET is_active = 1, end_date = ?1, shift_start = ?2, shift_end = ?3, assignment_type = ?4, assigned_by = ?5, assigned_at = ?6, updated_at = ?6 \
         WHERE id = ?7 AND is_active = 0",
    )
    .bind(data.end_date)
    .bind(data.shift_start)
    .bind(data.shift_end)
    .bind(data.assignment_type)
    .bind(data.assigned_by)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Inactive schedule {id} not found")));
    }
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Schedule {id} not found")))
}

pub async fn set_end_date(
    conn: &mut SqliteConnection,
    id: i64,
    end_date: NaiveDate,
    now: i64,
) -> RepoResult<AssignmentSchedule> {
    let rows = sqlx::query("UPDATE assignment_schedule SET end_date = ?1, updated_at = ?2 WHERE id = ?3 AND is_active = 1")
        .bind(end_date)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Active schedule {id} not found")));
    }
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Schedule {id} not found")))
}

pub async fn deactivate(conn: &mut SqliteConnection, id: i64, now: i64) -> RepoResult<AssignmentSchedule> {
    let rows = sqlx::query("UPDATE assignment_schedule SET is_active = 0, updated_at = ?1 WHERE id = ?2 AND is_active = 1")
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Active schedule {id} not found")));
    }
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Schedule {id} not found")))
}
