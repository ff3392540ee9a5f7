//! Date normalization for vendor exports and invoice headers.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::patterns::ISO_DATE;

/// Date-time layouts tried before plain dates, so a time-of-day suffix is accepted.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Plain date layouts. Month-first wins over day-first for ambiguous values.
/// Two-digit years go first, `%Y` would otherwise read "24" as year 24.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%d/%m/%y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%Y%m%d",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

/// Parse a date or date-time in any of the layouts vendors commonly export.
///
/// Time-of-day and offsets are discarded; the calendar date as written is kept.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local().date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.naive_local().date());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    None
}

/// Normalize a date cell to `YYYY-MM-DD`.
///
/// Falls back to an ISO date embedded in the value, then to the trimmed
/// original. Never fails; an empty cell stays empty.
pub fn normalize_date(value: &str) -> String {
    if let Some(date) = parse_date(value) {
        return date.format("%Y-%m-%d").to_string();
    }

    if let Some(caps) = ISO_DATE.captures(value) {
        return caps[1].to_string();
    }

    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_time() {
        assert_eq!(normalize_date("2024-03-15 10:32:00"), "2024-03-15");
        assert_eq!(normalize_date("2024-03-15T10:32:00.250"), "2024-03-15");
        assert_eq!(normalize_date("2024-03-15T23:59:59-05:00"), "2024-03-15");
        assert_eq!(normalize_date("03/15/2024 4:05 PM"), "2024-03-15");
    }

    #[test]
    fn test_normalize_us_and_day_first() {
        assert_eq!(normalize_date("3/15/2024"), "2024-03-15");
        assert_eq!(normalize_date("03/04/2024"), "2024-03-04");
        assert_eq!(normalize_date("15/03/2024"), "2024-03-15");
        assert_eq!(normalize_date("3/15/24"), "2024-03-15");
        assert_eq!(normalize_date("Mar 15, 2024"), "2024-03-15");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for value in ["2024-01-31", "1999-12-01", "2024-02-29"] {
            let once = normalize_date(value);
            assert_eq!(once, value);
            assert_eq!(normalize_date(&once), once);
        }
    }

    #[test]
    fn test_normalize_regex_fallback() {
        assert_eq!(normalize_date("processed 2024-03-15 batch 7"), "2024-03-15");
    }

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize_date("  pending  "), "pending");
        assert_eq!(normalize_date(""), "");
        assert_eq!(normalize_date("13/45/2024"), "13/45/2024");
    }
}
