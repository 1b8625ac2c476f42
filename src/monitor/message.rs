//! Notification text for a detected version change

use chrono::{DateTime, TimeZone};

/// Timestamp format used in notification text
pub const DETECTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats the push message sent when the version changes
pub fn format_update_message<Tz>(previous: &str, current: &str, detected_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "PGSharp update detected\nNew version: {}\nPrevious version: {}\nDetected at: {}",
        current,
        previous,
        detected_at.format(DETECTED_AT_FORMAT)
    )
}
