//! Appointment Repository
//!
//! The engine only reads appointments. `create` exists for the booking
//! subsystem's own setup and for tests.

use super::{RepoError, RepoResult};
use chrono::{NaiveDate, NaiveTime};
use shared::models::{Appointment, AppointmentCreate};
use sqlx::SqliteConnection;

const COLUMNS: &str = "id, patient_id, facility_id, service_id, scheduled_date, scheduled_time, created_at";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Appointment>> {
    let appointment = sqlx::query_as::<_, Appointment>(&format!("SELECT {COLUMNS} FROM appointment WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(appointment)
}

pub async fn create(conn: &mut SqliteConnection, data: &AppointmentCreate, now: i64) -> RepoResult<Appointment> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO appointment (patient_id, facility_id, service_id, scheduled_date, scheduled_time, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
    )
    .bind(data.patient_id)
    .bind(data.facility_id)
    .bind(data.service_id)
    .bind(data.scheduled_date)
    .bind(data.scheduled_time)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create appointment".into()))
}

/// Open queue entry whose appointment time may have passed
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OpenAppointmentEntry {
    pub entry_id: i64,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
}

/// `waiting` entries with an appointment scheduled on or before `up_to`
pub async fn find_waiting_entries_until(
    conn: &mut SqliteConnection,
    up_to: NaiveDate,
) -> RepoResult<Vec<OpenAppointmentEntry>> {
    let rows = sqlx::query_as::<_, OpenAppointmentEntry>(
        "SELECT q.id AS entry_id, a.scheduled_date, a.scheduled_time FROM queue_entry q JOIN appointment a ON a.id = q.appointment_id \
         WHERE q.status = 'waiting' AND a.scheduled_date <= ?1 ORDER BY a.scheduled_date, a.scheduled_time, q.id",
    )
    .bind(up_to)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}
