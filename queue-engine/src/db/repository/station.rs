//! Station Repository

use super::{RepoError, RepoResult};
use shared::models::{Station, StationCreate};
use sqlx::SqliteConnection;

const COLUMNS: &str =
    "id, name, station_type, station_number, service_id, is_active, is_open, created_at, updated_at";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Station>> {
    let station = sqlx::query_as::<_, Station>(&format!("SELECT {COLUMNS} FROM station WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(station)
}

pub async fn find_all(conn: &mut SqliteConnection, include_inactive: bool) -> RepoResult<Vec<Station>> {
    let stations = sqlx::query_as::<_, Station>(&format!(
        "SELECT {COLUMNS} FROM station WHERE (?1 OR is_active = 1) ORDER BY station_type, station_number, id"
    ))
    .bind(include_inactive)
    .fetch_all(&mut *conn)
    .await?;
    Ok(stations)
}

/// New station numbered after the highest existing one of its type
pub async fn create(conn: &mut SqliteConnection, data: &StationCreate, now: i64) -> RepoResult<Station> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("Station name is required".into()));
    }
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO station (name, station_type, station_number, service_id, is_active, is_open, created_at, updated_at) \
         VALUES (?1, ?2, (SELECT COALESCE(MAX(station_number), 0) + 1 FROM station WHERE station_type = ?2), ?3, 1, 1, ?4, ?4) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(data.station_type)
    .bind(data.service_id)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create station".into()))
}

pub async fn set_open(conn: &mut SqliteConnection, id: i64, open: bool, now: i64) -> RepoResult<Station> {
    let rows = sqlx::query("UPDATE station SET is_open = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(open)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Station {id} not found")));
    }
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Station {id} not found")))
}

pub async fn set_active(conn: &mut SqliteConnection, id: i64, active: bool, now: i64) -> RepoResult<Station> {
    let rows = sqlx::query("UPDATE station SET is_active = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(active)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Station {id} not found")));
    }
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Station {id} not found")))
}

/// Lowest-numbered active and open station, optionally restricted to one service
pub async fn first_open(conn: &mut SqliteConnection, service_id: Option<i64>) -> RepoResult<Option<Station>> {
    let station = sqlx::query_as::<_, Station>(&format!(
        "SELECT {COLUMNS} FROM station WHERE is_active = 1 AND is_open = 1 AND (?1 IS NULL OR service_id = ?1) \
         ORDER BY station_number, id LIMIT 1"
    ))
    .bind(service_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(station)
}
