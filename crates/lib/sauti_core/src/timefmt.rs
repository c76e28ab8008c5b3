//! Display-time timestamp formatting.

use chrono::DateTime;

/// Fallback when a wire timestamp cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Format an RFC 3339 wire timestamp for display, e.g. `"Jan 5, 2026 03:04 PM"`.
///
/// The transform is lossy on purpose: question timestamps exist only to be
/// shown. Empty or unparseable input yields [`INVALID_DATE`].
pub fn display_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%b %-d, %Y %I:%M %p").to_string(),
        Err(_) => INVALID_DATE.to_string(),
    }
}
