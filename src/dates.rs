//! Date recognition and human-friendly date labels.
//!
//! Publish dates are kept as the raw string found on the page; this module
//! only decides whether such a string is a real calendar date and, for
//! rendering, how long ago it was.
//!
//! # Recognized formats
//!
//! Tried in this order, first success wins:
//!
//! | Order | Format | Example |
//! |-------|--------|---------|
//! | 1 | RFC 3339 | `2024-03-05T14:30:00Z` |
//! | 2 | RFC 2822 | `Tue, 5 Mar 2024 14:30:00 +0000` |
//! | 3 | ISO date-time without zone | `2024-03-05T14:30:00`, `2024-03-05 14:30` |
//! | 4 | `YYYY-MM-DD`, `YYYY/MM/DD` | `2024-03-05` |
//! | 5 | `MM/DD/YYYY`, `MM-DD-YYYY` | `03/05/2024` |
//! | 6 | `DD/MM/YYYY`, `DD-MM-YYYY` | `25/03/2024` |
//! | 7 | Month-name forms, optionally after a weekday | `March 5, 2024`, `Tuesday, March 5, 2024` |
//! | 8 | Month-name forms with a time of day | `March 5, 2024 10:30 AM`, `5 March 2024 14:30` |
//!
//! Month-first wins whenever both readings are valid, so day-first only
//! applies when the first number cannot be a month.
//!
//! Values without a zone are read as UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%A %B %d, %Y",
    "%A, %d %B %Y",
];

const TEXT_DATETIME_FORMATS: &[&str] = &[
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y at %I:%M %p",
    "%B %d, %Y %H:%M",
    "%d %B %Y %H:%M",
    "%A, %B %d, %Y %I:%M %p",
    "%A, %d %B %Y %H:%M",
];

/// Parse `raw` as a calendar date or date-time.
///
/// Returns `None` for anything that is not a valid date, including
/// impossible dates such as `2024-02-30`.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
    {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    TEXT_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|dt| dt.and_utc())
}

/// `true` when `raw` is a recognizable date.
pub fn is_valid_date(raw: &str) -> bool {
    parse_date(raw).is_some()
}

/// Label a date relative to `now`.
///
/// Whole elapsed days are counted (rounded down): `0` is "Today", `1` is
/// "Yesterday", `2..=7` is "N days ago". Older and future dates are shown
/// as an absolute date such as `Mar 5, 2024`.
pub fn relative_label(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - date;
    if elapsed < Duration::zero() {
        return absolute_label(date);
    }
    match elapsed.num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days @ 2..=7 => format!("{days} days ago"),
        _ => absolute_label(date),
    }
}

/// Relative label for a raw date string, or "Date not available".
pub fn format_date(raw: &str, now: DateTime<Utc>) -> String {
    match parse_date(raw) {
        Some(date) => relative_label(date, now),
        None => "Date not available".to_string(),
    }
}

/// `true` when `raw` parses and lies no more than `threshold_days` before
/// `now`. Future dates are never recent.
pub fn is_recent(raw: &str, now: DateTime<Utc>, threshold_days: i64) -> bool {
    parse_date(raw).is_some_and(|date| {
        let elapsed = now - date;
        elapsed >= Duration::zero() && elapsed <= Duration::days(threshold_days)
    })
}

fn absolute_label(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_machine_formats() {
        assert_eq!(
            parse_date("2024-03-05T14:30:00Z"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-03-05T14:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 0).unwrap())
        );
        assert!(parse_date("Tue, 5 Mar 2024 14:30:00 +0000").is_some());
        assert!(parse_date("2024-03-05T14:30:00+0000").is_some());
        assert_eq!(
            parse_date("2024-03-05 14:30"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap())
        );
        assert_eq!(parse_date("2024-03-05"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_month_first_wins_when_ambiguous() {
        assert_eq!(parse_date("03/05/2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("03-05-2024"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_day_first_when_month_first_impossible() {
        assert_eq!(parse_date("25/03/2024"), Some(ymd(2024, 3, 25)));
        assert_eq!(parse_date("25-03-2024"), Some(ymd(2024, 3, 25)));
    }

    #[test]
    fn test_month_name_forms() {
        assert_eq!(parse_date("March 5, 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("Mar 5, 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("5 March 2024"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_weekday_and_time_of_day_forms() {
        assert_eq!(parse_date("Tuesday, March 5, 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("Tue, 5 March 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(
            parse_date("March 5, 2024 10:30 AM"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap())
        );
        assert_eq!(
            parse_date("Mar 5, 2024 at 4:15 PM"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 16, 15, 0).unwrap())
        );
        assert_eq!(
            parse_date("5 March 2024 14:30"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap())
        );
        // Weekday must agree with the date.
        assert!(parse_date("Monday, March 5, 2024").is_none());
    }

    #[test]
    fn test_rejects_non_dates() {
        assert!(parse_date("").is_none());
        assert!(parse_date("   ").is_none());
        assert!(parse_date("yesterday afternoon").is_none());
        assert!(parse_date("2024-02-30").is_none());
        assert!(parse_date("Sports").is_none());
        assert!(!is_valid_date("5 minutes read"));
    }

    #[test]
    fn test_relative_label_thresholds() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(relative_label(now - Duration::hours(23), now), "Today");
        assert_eq!(relative_label(now - Duration::hours(24), now), "Yesterday");
        assert_eq!(relative_label(now - Duration::hours(47), now), "Yesterday");
        assert_eq!(relative_label(now - Duration::days(2), now), "2 days ago");
        assert_eq!(relative_label(now - Duration::days(7), now), "7 days ago");
        assert_eq!(relative_label(ymd(2024, 3, 1), now), "Mar 1, 2024");
        assert_eq!(relative_label(ymd(2024, 4, 1), now), "Apr 1, 2024");
    }

    #[test]
    fn test_format_date_unparsable() {
        let now = ymd(2024, 3, 10);
        assert_eq!(format_date("soon", now), "Date not available");
        assert_eq!(format_date("2024-03-10", now), "Today");
    }

    #[test]
    fn test_is_recent() {
        let now = ymd(2024, 3, 10);
        assert!(is_recent("2024-03-05", now, 7));
        assert!(is_recent("2024-03-03", now, 7));
        assert!(!is_recent("2024-03-02", now, 7));
        assert!(!is_recent("not a date", now, 7));
        assert!(!is_recent("2024-03-11", now, 7));
        assert!(!is_recent("2025-01-01", now, 7));
    }
}
