use chrono::{NaiveTime, Timelike};

use crate::error::ValidationError;
use crate::validator::BROADCAST_DAY_SECS;

/// Seconds since midnight for a time of day.
pub fn time_to_secs(time: NaiveTime) -> f64 {
    time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1e9
}

/// Parse `HH:MM:SS` or `HH:MM` into seconds since midnight.
pub fn parse_clock(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map(time_to_secs)
        .map_err(|_| ValidationError::InvalidTime(input.to_string()))
}

/// Format seconds of the broadcast day as `HH:MM:SS`, wrapping past midnight.
pub fn format_clock(seconds: f64) -> String {
    let secs = seconds.rem_euclid(BROADCAST_DAY_SECS).floor() as u64;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
