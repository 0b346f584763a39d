//! Engine error taxonomy
//!
//! Every mutating operation rolls back its transaction on any of these
//! errors. Audit append failures are the exception: they are logged as
//! [`EngineError::Integrity`] and never abort the primary transition.

use crate::db::repository::RepoError;
use chrono::NaiveDate;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{QueueStatus, ScheduleConflict};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or malformed input, rejected before any write
    #[error("{message}")]
    Validation { code: ErrorCode, message: String },

    /// Target station already occupied for part of the requested range
    #[error("{message}")]
    StationConflict {
        message: String,
        conflicts: Vec<ScheduleConflict>,
    },

    /// Employee already bound to another station at an overlapping time
    #[error("{message}")]
    EmployeeConflict {
        message: String,
        conflicts: Vec<ScheduleConflict>,
    },

    #[error("Time slot {slot} on {date} is full ({capacity} patients); please choose another slot")]
    Capacity {
        date: NaiveDate,
        slot: String,
        capacity: i64,
    },

    #[error("Queue entry {entry_id} is {current}; cannot {attempted}")]
    InvalidState {
        entry_id: i64,
        current: QueueStatus,
        attempted: &'static str,
    },

    #[error("{message}")]
    NotFound { code: ErrorCode, message: String },

    #[error("No patients waiting at station {station_id} on {date}")]
    NoPatientsWaiting { station_id: i64, date: NaiveDate },

    #[error("No open station is available for service {service_id}")]
    NoOpenStation { service_id: i64 },

    /// Audit trail could not be written
    #[error("Audit integrity error: {0}")]
    Integrity(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::Repo(err.into())
    }
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
        }
    }

    pub fn invalid_date_range(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::InvalidDateRange,
            message: message.into(),
        }
    }

    pub fn invalid_shift_window(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::InvalidShiftWindow,
            message: message.into(),
        }
    }

    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn station_conflict(station_name: &str, conflicts: Vec<ScheduleConflict>) -> Self {
        let message = format!(
            "Station {} is already assigned for the requested dates: {}",
            station_name,
            describe_all(&conflicts)
        );
        Self::StationConflict { message, conflicts }
    }

    pub fn employee_conflict(employee_name: &str, conflicts: Vec<ScheduleConflict>) -> Self {
        let message = format!(
            "{} is already assigned elsewhere at an overlapping time: {}",
            employee_name,
            describe_all(&conflicts)
        );
        Self::EmployeeConflict { message, conflicts }
    }

    /// Error code callers see for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::StationConflict { .. } => ErrorCode::StationConflict,
            Self::EmployeeConflict { .. } => ErrorCode::EmployeeConflict,
            Self::Capacity { .. } => ErrorCode::SlotFull,
            Self::InvalidState { .. } => ErrorCode::InvalidTransition,
            Self::NotFound { code, .. } => *code,
            Self::NoPatientsWaiting { .. } => ErrorCode::NoPatientsWaiting,
            Self::NoOpenStation { .. } => ErrorCode::NoOpenStation,
            Self::Integrity(_) => ErrorCode::AuditAppendFailed,
            Self::Repo(RepoError::NotFound(_)) => ErrorCode::NotFound,
            Self::Repo(RepoError::Duplicate(_)) => ErrorCode::AlreadyExists,
            Self::Repo(RepoError::Validation(_)) => ErrorCode::ValidationFailed,
            Self::Repo(RepoError::Database(_)) => ErrorCode::DatabaseError,
        }
    }
}

fn describe_all(conflicts: &[ScheduleConflict]) -> String {
    conflicts
        .iter()
        .map(ScheduleConflict::describe)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            EngineError::StationConflict { conflicts, .. }
            | EngineError::EmployeeConflict { conflicts, .. } => AppError::with_message(code, message)
                .with_detail(
                    "conflicts",
                    serde_json::to_value(&conflicts).unwrap_or(Value::Null),
                ),
            EngineError::Capacity {
                date,
                slot,
                capacity,
            } => AppError::with_message(code, message)
                .with_detail("date", date.to_string())
                .with_detail("slot", slot)
                .with_detail("capacity", capacity),
            EngineError::InvalidState {
                entry_id,
                current,
                attempted,
            } => AppError::with_message(code, message)
                .with_detail("entry_id", entry_id)
                .with_detail("current_status", current.as_str())
                .with_detail("attempted", attempted),
            EngineError::NoPatientsWaiting { station_id, date } => {
                AppError::with_message(code, message)
                    .with_detail("station_id", station_id)
                    .with_detail("date", date.to_string())
            }
            EngineError::NoOpenStation { service_id } => {
                AppError::with_message(code, message).with_detail("service_id", service_id)
            }
            EngineError::Repo(RepoError::Database(e)) => {
                tracing::error!(error = %e, "Database error");
                AppError::database("A database error occurred")
            }
            _ => AppError::with_message(code, message),
        }
    }
}
