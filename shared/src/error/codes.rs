//! Unified error codes for the queue engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Station errors
//! - 2xxx: Assignment errors
//! - 3xxx: Queue errors
//! - 4xxx: Audit errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Station ====================
    /// Station not found
    StationNotFound = 1001,
    /// No active and open station can serve the request
    NoOpenStation = 1002,

    // ==================== 2xxx: Assignment ====================
    /// Assignment schedule not found
    ScheduleNotFound = 2001,
    /// Station already occupied for an overlapping date range
    StationConflict = 2002,
    /// Employee already bound to another station at an overlapping time
    EmployeeConflict = 2003,
    /// Employee not found
    EmployeeNotFound = 2004,
    /// Date range is invalid (end before start, effective date before start)
    InvalidDateRange = 2005,
    /// Shift window is invalid
    InvalidShiftWindow = 2006,

    // ==================== 3xxx: Queue ====================
    /// Queue entry not found
    QueueEntryNotFound = 3001,
    /// Time slot has reached its capacity
    SlotFull = 3002,
    /// Transition not allowed from the current status
    InvalidTransition = 3003,
    /// No patients waiting at the station
    NoPatientsWaiting = 3004,
    /// Appointment not found
    AppointmentNotFound = 3005,

    // ==================== 4xxx: Audit ====================
    /// Audit log append failed
    AuditAppendFailed = 4001,
    /// Audit hash chain broken
    AuditChainBroken = 4002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Station
            ErrorCode::StationNotFound => "Station not found",
            ErrorCode::NoOpenStation => "No open station is available for this service",

            // Assignment
            ErrorCode::ScheduleNotFound => "Assignment schedule not found",
            ErrorCode::StationConflict => "Station is already assigned for the requested dates",
            ErrorCode::EmployeeConflict => {
                "Employee is already assigned to another station at that time"
            }
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::InvalidDateRange => "Invalid date range",
            ErrorCode::InvalidShiftWindow => "Shift end must be after shift start",

            // Queue
            ErrorCode::QueueEntryNotFound => "Queue entry not found",
            ErrorCode::SlotFull => "Time slot is full, please choose another slot",
            ErrorCode::InvalidTransition => "Queue entry cannot make this transition",
            ErrorCode::NoPatientsWaiting => "No patients waiting",
            ErrorCode::AppointmentNotFound => "Appointment not found",

            // Audit
            ErrorCode::AuditAppendFailed => "Failed to record audit log",
            ErrorCode::AuditChainBroken => "Audit log chain is broken",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Station
            1001 => Ok(ErrorCode::StationNotFound),
            1002 => Ok(ErrorCode::NoOpenStation),

            // Assignment
            2001 => Ok(ErrorCode::ScheduleNotFound),
            2002 => Ok(ErrorCode::StationConflict),
            2003 => Ok(ErrorCode::EmployeeConflict),
            2004 => Ok(ErrorCode::EmployeeNotFound),
            2005 => Ok(ErrorCode::InvalidDateRange),
            2006 => Ok(ErrorCode::InvalidShiftWindow),

            // Queue
            3001 => Ok(ErrorCode::QueueEntryNotFound),
            3002 => Ok(ErrorCode::SlotFull),
            3003 => Ok(ErrorCode::InvalidTransition),
            3004 => Ok(ErrorCode::NoPatientsWaiting),
            3005 => Ok(ErrorCode::AppointmentNotFound),

            // Audit
            4001 => Ok(ErrorCode::AuditAppendFailed),
            4002 => Ok(ErrorCode::AuditChainBroken),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
