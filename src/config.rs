use anyhow::Result;
use chrono::FixedOffset;
use std::env;

use crate::attendance::AttendancePolicy;
use crate::utils::time::{parse_offset, parse_time_string};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub utc_offset: Option<FixedOffset>,
    pub policy: AttendancePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:attendance.db".to_string());

        // Unset means the host's local offset.
        let utc_offset = env::var("UTC_OFFSET")
            .ok()
            .map(|value| parse_offset(&value))
            .transpose()
            .map_err(|e| anyhow::anyhow!("UTC_OFFSET: {}", e))?;

        let mut policy = AttendancePolicy::default();

        if let Ok(value) = env::var("LATE_AFTER") {
            policy.late_after =
                parse_time_string(&value).map_err(|e| anyhow::anyhow!("LATE_AFTER: {}", e))?;
        }

        if let Ok(value) = env::var("HALF_DAY_HOURS") {
            let hours: f64 = value
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("HALF_DAY_HOURS must be a number, got '{}'", value))?;
            if !(0.0..=24.0).contains(&hours) {
                return Err(anyhow::anyhow!("HALF_DAY_HOURS must be between 0 and 24"));
            }
            policy.half_day_hours = hours;
        }

        Ok(Config {
            database_url,
            utc_offset,
            policy,
        })
    }
}
