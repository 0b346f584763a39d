//! Employee Repository

use super::{RepoError, RepoResult};
use shared::models::{Employee, EmployeeCreate};
use sqlx::SqliteConnection;

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(
        "SELECT id, name, is_active, created_at FROM employee WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(employee)
}

pub async fn create(
    conn: &mut SqliteConnection,
    data: &EmployeeCreate,
    now: i64,
) -> RepoResult<Employee> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("Employee name is required".into()));
    }
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO employee (name, is_active, created_at) VALUES (?1, 1, ?2) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}
