//! Tolerant parsing for the date strings the upstream APIs return.
//!
//! The same logical date shows up in several formats depending on endpoint
//! and field; every caller wants "the calendar date, or nothing."

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a timestamp in any of the known upstream formats.
///
/// Offset-carrying timestamps are normalized to UTC; a bare date parses as
/// midnight. Unknown formats yield `None`, never an error.
pub fn parse_flexible_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if format.contains("%z") {
            if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
                return Some(parsed.naive_utc());
            }
        } else if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    parse_flexible_date(raw).and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse a calendar date; any `T`-suffixed time component is ignored.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().split('T').next().unwrap_or_default();
    if head.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(head, format).ok())
}
