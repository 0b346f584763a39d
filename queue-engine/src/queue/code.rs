//! Queue code generation
//!
//! `DDMMYY-SLOT-SEQ`, e.g. `150125-08A-001`. The slot is derived from the
//! appointment hour; minutes are ignored.

use chrono::{NaiveDate, NaiveTime, Timelike};
use std::fmt;

/// Label of the slot for hours outside the business window
pub const UNSCHEDULED_SLOT: &str = "UNS";

/// Highest sequence that fits the three-digit `SEQ` field
pub const MAX_SLOT_SEQUENCE: i64 = 999;

/// Coarse time bucket scoping sequence numbers and capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSlot {
    /// Hour before noon, 24-hour clock
    Morning(u32),
    Noon,
    /// Hour after noon, 12-hour clock
    Afternoon(u32),
    Unscheduled,
}

impl TimeSlot {
    /// Slot for an appointment time within `[start_hour, end_hour]`
    pub fn for_time(time: NaiveTime, start_hour: u32, end_hour: u32) -> Self {
        let hour = time.hour();
        if hour < start_hour || hour > end_hour {
            return TimeSlot::Unscheduled;
        }
        match hour {
            0..=11 => TimeSlot::Morning(hour),
            12 => TimeSlot::Noon,
            _ => TimeSlot::Afternoon(hour - 12),
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Position of the slot in the day; `Unscheduled` sorts after every hour
    pub fn ordinal(&self) -> i64 {
        match *self {
            TimeSlot::Morning(h) => i64::from(h),
            TimeSlot::Noon => 12,
            TimeSlot::Afternoon(h) => i64::from(h) + 12,
            TimeSlot::Unscheduled => 24,
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSlot::Morning(h) => write!(f, "{:02}A", h),
            TimeSlot::Noon => f.write_str("12N"),
            TimeSlot::Afternoon(h) => write!(f, "{:02}P", h),
            TimeSlot::Unscheduled => f.write_str(UNSCHEDULED_SLOT),
        }
    }
}

/// `2025-01-15` → `150125`
pub fn date_token(date: NaiveDate) -> String {
    date.format("%d%m%y").to_string()
}

pub fn format_queue_code(date: NaiveDate, slot: &str, sequence: i64) -> String {
    format!("{}-{}-{:03}", date_token(date), slot, sequence)
}
