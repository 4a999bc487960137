//! Clip length from subtitle-style timestamps.

use tracing::warn;

/// Length reported when a timestamp cannot be parsed.
pub const DEFAULT_DURATION_SECS: i64 = 180;

/// Seconds between two `H:MM:SS,mmm` timestamps, rounded down.
///
/// Malformed input yields [`DEFAULT_DURATION_SECS`]. An end before the start
/// yields 0.
pub fn calculate_duration(start_time: &str, end_time: &str) -> i64 {
    let (Some(start), Some(end)) = (timestamp_seconds(start_time), timestamp_seconds(end_time))
    else {
        return DEFAULT_DURATION_SECS;
    };

    let elapsed = (end - start).floor();
    if !elapsed.is_finite() {
        return DEFAULT_DURATION_SECS;
    }

    if elapsed < 0.0 {
        warn!(
            "Clip ends before it starts ({} -> {}), using 0 seconds",
            start_time, end_time
        );
        return 0;
    }

    elapsed as i64
}

/// Parse `H:MM:SS,mmm` (a `.` separator is accepted too) into seconds.
pub fn timestamp_seconds(timestamp: &str) -> Option<f64> {
    let parts: Vec<&str> = timestamp.trim().split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return None;
    };

    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.replace(',', ".").parse().ok()?;

    let whole = hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?;
    Some(whole as f64 + seconds)
}
