//! Interval overlap
//!
//! One half-open predicate, `[a_start, a_end) ∩ [b_start, b_end) ≠ ∅`, shared
//! by the station-conflict check (dates) and the employee-conflict check
//! (dates and shift windows). A missing end is unbounded.

use chrono::{NaiveDate, NaiveTime};
use shared::models::{AssignmentSchedule, ScheduleConflict};

/// `[a_start, a_end) ∩ [b_start, b_end) ≠ ∅`, `None` = +∞
pub fn half_open_overlaps<T: Ord>(a_start: T, a_end: Option<T>, b_start: T, b_end: Option<T>) -> bool {
    let a_before_b_ends = b_end.is_none_or(|b_end| a_start < b_end);
    let b_before_a_ends = a_end.is_none_or(|a_end| b_start < a_end);
    a_before_b_ends && b_before_a_ends
}

/// Inclusive date range, open-ended when `end` is `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Exclusive upper bound; the last representable date counts as open
    fn end_exclusive(&self) -> Option<NaiveDate> {
        self.end.and_then(|end| end.succ_opt())
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        half_open_overlaps(self.start, self.end_exclusive(), other.start, other.end_exclusive())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.overlaps(&DateRange::new(date, Some(date)))
    }
}

impl From<&AssignmentSchedule> for DateRange {
    fn from(s: &AssignmentSchedule) -> Self {
        DateRange::new(s.start_date, s.end_date)
    }
}

impl From<&ScheduleConflict> for DateRange {
    fn from(s: &ScheduleConflict) -> Self {
        DateRange::new(s.start_date, s.end_date)
    }
}

/// Time-of-day window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ShiftWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whole day, used when the caller does not know the shift yet
    pub fn full_day() -> Self {
        Self {
            start: NaiveTime::MIN,
            end: NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    pub fn overlaps(&self, other: &ShiftWindow) -> bool {
        half_open_overlaps(self.start, Some(self.end), other.start, Some(other.end))
    }
}

impl From<&ScheduleConflict> for ShiftWindow {
    fn from(s: &ScheduleConflict) -> Self {
        ShiftWindow::new(s.shift_start, s.shift_end)
    }
}
