//! Visit Repository

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::Visit;
use sqlx::SqliteConnection;

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Visit>> {
    let visit = sqlx::query_as::<_, Visit>(
        "SELECT id, patient_id, appointment_id, visit_date, arrival_time, created_at FROM visit WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(visit)
}

pub async fn create(
    conn: &mut SqliteConnection,
    patient_id: i64,
    appointment_id: Option<i64>,
    visit_date: NaiveDate,
    now: i64,
) -> RepoResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO visit (patient_id, appointment_id, visit_date, created_at) VALUES (?1, ?2, ?3, ?4) RETURNING id",
    )
    .bind(patient_id)
    .bind(appointment_id)
    .bind(visit_date)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn stamp_arrival(conn: &mut SqliteConnection, id: i64, arrival_time: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE visit SET arrival_time = ?1 WHERE id = ?2")
        .bind(arrival_time)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Visit {id} not found")));
    }
    Ok(())
}
