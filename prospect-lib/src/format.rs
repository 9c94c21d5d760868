//! Display formatting for transformed rows.
//!
//! Every helper accepts a missing value and returns a placeholder instead,
//! so transformers never fail on incomplete records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use datagrid::row::{PLACEHOLDER, UNKNOWN};

/// Fixed display pattern for timestamps, e.g. `Mar 4, 2024 09:15`.
pub const DATE_FORMAT: &str = "%b %-d, %Y %H:%M";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a server timestamp.
///
/// Accepts RFC 3339 and naive `YYYY-MM-DD[ HH:MM[:SS]]` forms; naive values
/// are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Format a timestamp with [`DATE_FORMAT`].
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(DATE_FORMAT).to_string()
}

/// Format a raw timestamp; missing or unparseable input gives the
/// placeholder.
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| format_datetime(&dt))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Format a count with thousands separators: `1234567` → `1,234,567`.
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// [`format_count`] with a placeholder for missing counts.
pub fn format_optional_count(n: Option<i64>) -> String {
    n.map(format_count)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Trimmed text, or the placeholder when missing or blank.
pub fn placeholder_text(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Status label: `in_progress` → `In progress`; missing gives `Unknown`.
pub fn format_status(raw: Option<&str>) -> String {
    let Some(status) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return UNKNOWN.to_string();
    };
    let status = status.replace(['_', '-'], " ").to_lowercase();
    let mut chars = status.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2024-03-04T09:15:00Z")), "Mar 4, 2024 09:15");
        assert_eq!(format_date(Some("2024-03-04T09:15:00+02:00")), "Mar 4, 2024 07:15");
        assert_eq!(format_date(Some("2023-12-25 18:30:00")), "Dec 25, 2023 18:30");
        assert_eq!(format_date(Some("2023-12-25")), "Dec 25, 2023 00:00");
    }

    #[test]
    fn test_format_date_placeholder() {
        assert_eq!(format_date(None), "—");
        assert_eq!(format_date(Some("")), "—");
        assert_eq!(format_date(Some("yesterday")), "—");
    }

    #[test]
    fn test_parse_timestamp_with_fraction() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let parsed = parse_timestamp("2024-01-02T03:04:05.123").unwrap();
        assert_eq!(parsed.timestamp(), expected.timestamp());
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(-45000), "-45,000");
        assert_eq!(format_optional_count(None), "—");
    }

    #[test]
    fn test_placeholder_text() {
        assert_eq!(placeholder_text(Some("  Acme ")), "Acme");
        assert_eq!(placeholder_text(Some("   ")), "—");
        assert_eq!(placeholder_text(None), "—");
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(Some("active")), "Active");
        assert_eq!(format_status(Some("IN_PROGRESS")), "In progress");
        assert_eq!(format_status(Some("")), "Unknown");
        assert_eq!(format_status(None), "Unknown");
    }
}
