use std::time::{Duration, SystemTime};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

/// Relative age of `then` as seen from `now`, e.g. `"5 minutes ago"`.
///
/// Timestamps in the future read as `"just now"`.
pub fn time_ago(then: SystemTime, now: SystemTime) -> String {
    let elapsed = now
        .duration_since(then)
        .unwrap_or(Duration::ZERO)
        .as_secs();

    let (count, unit) = match elapsed {
        s if s < MINUTE => return "just now".to_string(),
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < WEEK => (s / DAY, "day"),
        s => (s / WEEK, "week"),
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
