//! Relative timestamp formatting

use chrono::{DateTime, Utc};

/// Format a timestamp relative to `now`.
///
/// - under a minute (or in the future): `just now`
/// - under an hour: `5m ago`
/// - under a day: `3h ago`
/// - under a week: `2d ago`
/// - otherwise the date, e.g. `Mar 4, 2024`
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);

    if elapsed.num_seconds() < 60 {
        "just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        timestamp.format("%b %-d, %Y").to_string()
    }
}

/// Parse an RFC 3339 timestamp and format it relative to `now`.
///
/// Returns `None` for text that is not a valid timestamp.
pub fn format_relative_str(timestamp: &str, now: DateTime<Utc>) -> Option<String> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| format_relative_time(t.with_timezone(&Utc), now))
}
