use chrono::{DateTime, Local};

/// Get current local wall-clock time formatted as `HH:MM:SS`
pub fn local_clock_now() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Convert an RFC 3339 timestamp into local `HH:MM:SS`.
///
/// Returns `None` when the input is not valid RFC 3339.
pub fn rfc3339_to_local_clock(timestamp: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
}
