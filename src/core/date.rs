//! Date-token parsing and the inclusive date interval.
//!
//! The backend renders order dates as `DD.MM.YYYY`; the range inputs accept
//! the same form (plus two-digit years, which the old web UI's picker could
//! emit). All comparisons happen on real calendar dates so interval checks
//! follow chronology — never string order over concatenated digits.

use chrono::NaiveDate;
use thiserror::Error;

// ───────────────────────────────────────── errors ────────────

/// Failure modes when reading a `DD.MM.YYYY` / `DD.MM.YY` token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateParseError {
    /// Not exactly three dot-separated numeric components.
    #[error("malformed date token {0:?} (expected DD.MM.YYYY)")]
    Malformed(String),
    /// Three components, but no such day on the calendar.
    #[error("no such calendar date: {0:?}")]
    OutOfRange(String),
}

// ───────────────────────────────────────── parsing ───────────

/// Parse a `DD.MM.YYYY` or `DD.MM.YY` token into a calendar date.
///
/// Two-digit years land in 2000–2099. Callers decide how to recover from an
/// error: range inputs fall back to an open bound, table rows stay visible.
pub fn parse_date_token(raw: &str) -> Result<NaiveDate, DateParseError> {
    let token = raw.trim();
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(DateParseError::Malformed(token.to_string()));
    }

    let malformed = || DateParseError::Malformed(token.to_string());
    let day: u32 = parts[0].trim().parse().map_err(|_| malformed())?;
    let month: u32 = parts[1].trim().parse().map_err(|_| malformed())?;
    let year_part = parts[2].trim();
    let mut year: i32 = year_part.parse().map_err(|_| malformed())?;
    if year_part.len() <= 2 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateParseError::OutOfRange(token.to_string()))
}

/// Lenient parse of the backend's `date_created` strings.
///
/// Django serialises datetimes as ISO-8601 — with an offset, a trailing `Z`,
/// or naive — and snapshot files may carry bare dates or already-rendered
/// tokens. `None` means the row simply has no usable date.
pub fn parse_backend_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    parse_date_token(s).ok()
}

/// Render a date the way the table shows it (`DD.MM.YYYY`).
pub fn format_date_token(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

// ───────────────────────────────────────── interval ──────────

/// Inclusive date range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateInterval {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateInterval {
    /// Both bounds open — keeps everything.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Inclusive containment. Each bound is checked independently, so a
    /// reversed range (start after end) matches nothing rather than
    /// panicking or flipping.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_full_year_tokens() {
        assert_eq!(parse_date_token("12.08.2024"), Ok(d(2024, 8, 12)));
        assert_eq!(parse_date_token(" 01.01.1999 "), Ok(d(1999, 1, 1)));
    }

    #[test]
    fn parses_two_digit_years_into_this_century() {
        assert_eq!(parse_date_token("05.01.24"), Ok(d(2024, 1, 5)));
        assert_eq!(parse_date_token("31.12.99"), Ok(d(2099, 12, 31)));
    }

    #[test]
    fn token_order_matches_chronology() {
        let pairs = [
            ("31.12.2023", "01.01.2024"),
            ("09.06.2024", "10.06.2024"),
            ("30.09.2024", "01.10.2024"),
            ("28.02.24", "01.03.2024"),
        ];
        for (earlier, later) in pairs {
            assert!(
                parse_date_token(earlier).unwrap() < parse_date_token(later).unwrap(),
                "{earlier} should sort before {later}"
            );
        }
    }

    #[test]
    fn rejects_wrong_component_count() {
        assert!(matches!(
            parse_date_token("2024.13"),
            Err(DateParseError::Malformed(_))
        ));
        assert!(matches!(parse_date_token(""), Err(DateParseError::Malformed(_))));
        assert!(matches!(
            parse_date_token("01.02.03.04"),
            Err(DateParseError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_components() {
        assert!(matches!(
            parse_date_token("aa.bb.cccc"),
            Err(DateParseError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_impossible_calendar_days() {
        assert!(matches!(
            parse_date_token("31.02.2024"),
            Err(DateParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_date_token("01.13.2024"),
            Err(DateParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn backend_dates_accept_the_observed_shapes() {
        let expect = Some(d(2024, 8, 12));
        assert_eq!(parse_backend_date("2024-08-12T09:31:04+02:00"), expect);
        assert_eq!(parse_backend_date("2024-08-12T09:31:04.123456Z"), expect);
        assert_eq!(parse_backend_date("2024-08-12T09:31:04"), expect);
        assert_eq!(parse_backend_date("2024-08-12 09:31:04"), expect);
        assert_eq!(parse_backend_date("2024-08-12"), expect);
        assert_eq!(parse_backend_date("12.08.2024"), expect);
        assert_eq!(parse_backend_date(""), None);
        assert_eq!(parse_backend_date("soon"), None);
    }

    #[test]
    fn formats_back_to_table_tokens() {
        assert_eq!(format_date_token(d(2024, 8, 12)), "12.08.2024");
        assert_eq!(format_date_token(d(2024, 1, 5)), "05.01.2024");
    }

    #[test]
    fn unbounded_interval_contains_everything() {
        let interval = DateInterval::default();
        assert!(interval.is_unbounded());
        assert!(interval.contains(d(1970, 1, 1)));
        assert!(interval.contains(d(2999, 12, 31)));
    }

    #[test]
    fn bounds_are_inclusive_on_both_ends() {
        let day = d(2024, 6, 15);
        let interval = DateInterval {
            start: Some(day),
            end: Some(day),
        };
        assert!(interval.contains(day));
        assert!(!interval.contains(d(2024, 6, 14)));
        assert!(!interval.contains(d(2024, 6, 16)));
    }

    #[test]
    fn half_open_intervals_check_only_their_bound() {
        let from = DateInterval {
            start: Some(d(2024, 6, 1)),
            end: None,
        };
        assert!(from.contains(d(2030, 1, 1)));
        assert!(!from.contains(d(2024, 5, 31)));

        let until = DateInterval {
            start: None,
            end: Some(d(2024, 1, 1)),
        };
        assert!(until.contains(d(2024, 1, 1)));
        assert!(until.contains(d(2023, 12, 31)));
        assert!(!until.contains(d(2024, 1, 2)));
    }

    #[test]
    fn reversed_interval_matches_nothing() {
        let interval = DateInterval {
            start: Some(d(2024, 7, 1)),
            end: Some(d(2024, 6, 1)),
        };
        assert!(!interval.contains(d(2024, 6, 15)));
        assert!(!interval.contains(d(2024, 7, 1)));
        assert!(!interval.contains(d(2024, 6, 1)));
    }
}
