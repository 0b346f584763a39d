//! Business time zone helpers
//!
//! Instants are stored as Unix millis; dates and times of day are local to
//! the configured business time zone.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

/// Today's date in the business time zone
pub fn business_date(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// Business date containing the instant `millis`
pub fn business_date_at(millis: i64, tz: Tz) -> NaiveDate {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&tz).date_naive())
        .unwrap_or_else(|| business_date(tz))
}

/// Local date + time → Unix millis
///
/// DST gap fallback: a local time that does not exist is read as UTC.
pub fn local_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    let naive = date.and_time(time);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}
