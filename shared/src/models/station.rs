//! Station Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of service point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum StationType {
    CheckIn,
    Triage,
    Consultation,
    Lab,
    Pharmacy,
    Billing,
    Document,
}

impl StationType {
    pub const ALL: [StationType; 7] = [
        StationType::CheckIn,
        StationType::Triage,
        StationType::Consultation,
        StationType::Lab,
        StationType::Pharmacy,
        StationType::Billing,
        StationType::Document,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckIn => "check_in",
            Self::Triage => "triage",
            Self::Consultation => "consultation",
            Self::Lab => "lab",
            Self::Pharmacy => "pharmacy",
            Self::Billing => "billing",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Station entity
///
/// `is_active` says whether the station exists for use at all, `is_open`
/// whether it currently accepts new patients. Stations are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Station {
    pub id: i64,
    pub name: String,
    pub station_type: StationType,
    /// Sequence number within `station_type`, starting at 1
    pub station_number: i64,
    /// Service this station fulfils
    pub service_id: i64,
    pub is_active: bool,
    pub is_open: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Station {
    /// Whether routing may send new patients here
    pub fn accepts_patients(&self) -> bool {
        self.is_active && self.is_open
    }
}

/// Create station payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationCreate {
    pub name: String,
    pub station_type: StationType,
    pub service_id: i64,
}
