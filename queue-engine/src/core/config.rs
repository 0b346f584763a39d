use chrono_tz::Tz;
use shared::error::{AppError, ErrorCode};
use std::path::PathBuf;
use std::str::FromStr;

/// Engine configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | base directory (database + logs) |
/// | DATABASE_PATH | $WORK_DIR/queue.db | SQLite file |
/// | LOG_LEVEL | info | tracing level |
/// | TIMEZONE | Asia/Manila | business time zone |
/// | PRIMARY_FACILITY_ID | 1 | facility whose appointments get queue codes |
/// | SLOT_CAPACITY | 20 | max non-cancelled entries per date + slot |
/// | TEMPORARY_ASSIGNMENT_DAYS | 30 | default window for temporary assignments |
/// | BUSINESS_START_HOUR | 7 | first hour mapped to a named slot |
/// | BUSINESS_END_HOUR | 17 | last hour mapped to a named slot |
/// | INTEGRITY_CHECK_INTERVAL_SECS | 3600 | audit integrity check period |
/// | STALE_SWEEP_INTERVAL_SECS | 900 | stale-entry sweep period |
/// | STALE_GRACE_MINUTES | 120 | grace after the appointment time before sweeping |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/queue SLOT_CAPACITY=25 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub database_path: String,
    pub log_level: String,
    pub timezone: Tz,
    pub primary_facility_id: i64,
    pub slot_capacity: i64,
    pub temporary_assignment_days: i64,
    pub business_start_hour: u32,
    pub business_end_hour: u32,
    pub integrity_check_interval_secs: u64,
    pub stale_sweep_interval_secs: u64,
    pub stale_grace_minutes: i64,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("queue.db")
                .to_string_lossy()
                .into_owned()
        });
        let timezone = std::env::var("TIMEZONE")
            .ok()
            .and_then(|tz| match tz.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(e) => {
                    tracing::warn!("Invalid TIMEZONE '{}': {}, falling back to Asia/Manila", tz, e);
                    None
                }
            })
            .unwrap_or(chrono_tz::Asia::Manila);

        Self {
            work_dir,
            database_path,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            timezone,
            primary_facility_id: env_or("PRIMARY_FACILITY_ID", 1),
            slot_capacity: env_or("SLOT_CAPACITY", 20),
            temporary_assignment_days: env_or("TEMPORARY_ASSIGNMENT_DAYS", 30),
            business_start_hour: env_or("BUSINESS_START_HOUR", 7),
            business_end_hour: env_or("BUSINESS_END_HOUR", 17),
            integrity_check_interval_secs: env_or("INTEGRITY_CHECK_INTERVAL_SECS", 3600),
            stale_sweep_interval_secs: env_or("STALE_SWEEP_INTERVAL_SECS", 900),
            stale_grace_minutes: env_or("STALE_GRACE_MINUTES", 120),
        }
    }

    /// Defaults without reading the environment
    pub fn for_tests() -> Self {
        Self {
            work_dir: "./data".into(),
            database_path: ":memory:".into(),
            log_level: "debug".into(),
            timezone: chrono_tz::Asia::Manila,
            primary_facility_id: 1,
            slot_capacity: 20,
            temporary_assignment_days: 30,
            business_start_hour: 7,
            business_end_hour: 17,
            integrity_check_interval_secs: 3600,
            stale_sweep_interval_secs: 900,
            stale_grace_minutes: 120,
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), AppError> {
        if self.slot_capacity < 1 {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                format!("SLOT_CAPACITY must be at least 1, got {}", self.slot_capacity),
            ));
        }
        if self.temporary_assignment_days < 1 {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                format!(
                    "TEMPORARY_ASSIGNMENT_DAYS must be at least 1, got {}",
                    self.temporary_assignment_days
                ),
            ));
        }
        if self.business_start_hour > self.business_end_hour || self.business_end_hour > 23 {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                format!(
                    "Business hours {}..={} are not a valid window",
                    self.business_start_hour, self.business_end_hour
                ),
            ));
        }
        if self.integrity_check_interval_secs == 0 || self.stale_sweep_interval_secs == 0 {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                "Background job intervals must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::for_tests();
        assert!(config.validate().is_ok());
        assert_eq!(config.slot_capacity, 20);
        assert_eq!(config.temporary_assignment_days, 30);
        assert_eq!(config.timezone, chrono_tz::Asia::Manila);
        assert!(config.log_dir().ends_with("logs"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::for_tests();
        config.slot_capacity = 0;
        assert_eq!(config.validate().unwrap_err().code, ErrorCode::ConfigError);

        let mut config = Config::for_tests();
        config.business_start_hour = 18;
        assert!(config.validate().is_err());

        let mut config = Config::for_tests();
        config.business_end_hour = 24;
        assert!(config.validate().is_err());

        let mut config = Config::for_tests();
        config.stale_sweep_interval_secs = 0;
        assert!(config.validate().is_err());
    }
}
