//! Calendar date parsing.
//!
//! All dates in leg records, queries and cache keys use ISO `YYYY-MM-DD`.
//! There is no time-of-day component anywhere in the planner.

use chrono::NaiveDate;

/// Format used for every date the planner reads or writes.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error returned when a date string is not a valid ISO calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date {input:?}: expected YYYY-MM-DD")]
pub struct InvalidDate {
    input: String,
}

/// Parse an ISO `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(s: &str) -> Result<NaiveDate, InvalidDate> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| InvalidDate {
        input: trimmed.to_string(),
    })
}

/// Format a date the way it is written to disk and shown to users.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole days from `from` to `to`; negative if `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2024-01-05").unwrap(), date(2024, 1, 5));
        assert_eq!(parse_date(" 2024-02-29 ").unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_date("2024/01/05").is_err());
        assert!(parse_date("05-01-2024").is_err());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn error_display() {
        let err = parse_date("tomorrow").unwrap_err();
        assert_eq!(err.to_string(), "invalid date \"tomorrow\": expected YYYY-MM-DD");
    }

    #[test]
    fn format_roundtrip() {
        assert_eq!(format_date(date(2024, 3, 9)), "2024-03-09");
    }

    #[test]
    fn days_between_dates() {
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 5)), 4);
        assert_eq!(days_between(date(2024, 1, 5), date(2024, 1, 1)), -4);
        assert_eq!(days_between(date(2024, 2, 28), date(2024, 3, 1)), 2);
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 1)), 0);
    }
}
