//! Appointment Model
//!
//! Appointments are owned by the booking subsystem; the queue engine only
//! reads them to derive queue dates and codes.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Appointment row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub facility_id: i64,
    pub service_id: i64,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub created_at: i64,
}

/// Create appointment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    pub patient_id: i64,
    pub facility_id: i64,
    pub service_id: i64,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
}
