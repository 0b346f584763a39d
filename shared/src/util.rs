/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Whole minutes elapsed between two millisecond instants, never negative
pub fn elapsed_minutes(from_millis: i64, to_millis: i64) -> i64 {
    (to_millis - from_millis).max(0) / 60_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_minutes() {
        assert_eq!(elapsed_minutes(0, 59_999), 0);
        assert_eq!(elapsed_minutes(0, 60_000), 1);
        assert_eq!(elapsed_minutes(1_000, 1_000 + 25 * 60_000 + 30_000), 25);
        assert_eq!(elapsed_minutes(10_000, 0), 0);
    }
}
