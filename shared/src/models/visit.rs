//! Visit Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One patient visit to the facility; every queue entry hangs off a visit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Visit {
    pub id: i64,
    pub patient_id: i64,
    pub appointment_id: Option<i64>,
    pub visit_date: NaiveDate,
    /// Set at check-in
    pub arrival_time: Option<i64>,
    pub created_at: i64,
}
