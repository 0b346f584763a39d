//! Assignment Schedule Model (employee ↔ station bindings)

use super::station::Station;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Assignment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum AssignmentType {
    /// Open-ended unless an end date is given
    Permanent,
    /// Defaults to a fixed window when no end date is given
    Temporary,
}

/// Date-ranged binding of one employee to one station
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AssignmentSchedule {
    pub id: i64,
    pub employee_id: i64,
    pub station_id: i64,
    pub start_date: NaiveDate,
    /// Inclusive last day; `None` = open-ended
    pub end_date: Option<NaiveDate>,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
    pub assignment_type: AssignmentType,
    pub is_active: bool,
    pub assigned_by: Option<i64>,
    pub assigned_at: i64,
    pub updated_at: i64,
}

impl AssignmentSchedule {
    /// Whether the date range includes `date` (ignores `is_active`)
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.is_none_or(|end| date <= end)
    }
}

/// Assign request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRequest {
    pub employee_id: i64,
    pub station_id: i64,
    pub start_date: NaiveDate,
    pub assignment_type: AssignmentType,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
    pub assigned_by: Option<i64>,
    pub end_date: Option<NaiveDate>,
}

/// Reassign request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignRequest {
    pub station_id: i64,
    pub new_employee_id: i64,
    pub effective_date: NaiveDate,
    pub assigned_by: Option<i64>,
}

/// How `remove` takes a station's occupant off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveMode {
    /// Close the date range the day before the effective date
    EndAssignment,
    /// Flip the active flag; the date range is kept for reactivation
    Deactivate,
}

/// Remove request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveRequest {
    pub station_id: i64,
    pub effective_date: NaiveDate,
    pub mode: RemoveMode,
    pub performed_by: Option<i64>,
}

/// An existing schedule that blocks a requested assignment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ScheduleConflict {
    pub schedule_id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub station_id: i64,
    pub station_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub shift_start: NaiveTime,
    pub shift_end: NaiveTime,
}

impl ScheduleConflict {
    /// Human-readable summary, e.g. `Ana Cruz at Triage 1 from 2025-01-10 (open-ended), 08:00-17:00`
    pub fn describe(&self) -> String {
        let until = match self.end_date {
            Some(end) => format!("to {}", end),
            None => "(open-ended)".to_string(),
        };
        format!(
            "{} at {} from {} {}, {}-{}",
            self.employee_name,
            self.station_name,
            self.start_date,
            until,
            self.shift_start.format("%H:%M"),
            self.shift_end.format("%H:%M"),
        )
    }
}

/// Result of the non-mutating conflict pre-check
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConflictReport {
    pub employee_conflicts: Vec<ScheduleConflict>,
    pub station_conflicts: Vec<ScheduleConflict>,
}

impl ConflictReport {
    pub fn is_clear(&self) -> bool {
        self.employee_conflicts.is_empty() && self.station_conflicts.is_empty()
    }
}

/// Station together with whoever covers it on a given date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationWithSchedule {
    pub station: Station,
    pub schedule: Option<AssignmentSchedule>,
    pub employee_name: Option<String>,
}
