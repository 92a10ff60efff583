//! Timestamp handling for dispatch-service rows.
//!
//! The TableData service reports planned times as locale text such as
//! `"3.9.15 0:17"` or `"3.9.2015 0:17"` (day and month without leading
//! zeros, two- or four-digit year). This module turns that text into an
//! absolute instant in the stop's time zone, and provides the few calendar
//! helpers the fetcher and the stop-time window need.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Two-digit years below this pivot belong to the 2000s, the rest to the 1900s.
const TWO_DIGIT_YEAR_PIVOT: i32 = 80;

/// Formats tried when the text is not in the locale `D.M.YY H:MM` shape.
const GENERIC_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Error returned when a timestamp text cannot be turned into an instant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {text:?}: {reason}")]
pub struct TimeError {
    text: String,
    reason: &'static str,
}

impl TimeError {
    fn new(text: &str, reason: &'static str) -> Self {
        Self {
            text: text.to_string(),
            reason,
        }
    }
}

/// Parse a planned-time text into an instant in `tz`.
///
/// The locale form `D.M.YY H:MM` / `D.M.YYYY H:MM` is tried first. Text
/// that does not have that shape goes through a generic parse (RFC 3339,
/// then ISO-8601 local date-times). Text that has the locale shape but
/// names an impossible date is rejected rather than rolled over.
///
/// # Examples
///
/// ```
/// use bus_proxy::domain::parse_planned_time;
/// use chrono::{Datelike, Timelike};
///
/// let tz = chrono_tz::Europe::Bratislava;
/// let t = parse_planned_time("3.9.15 0:17", tz).unwrap();
/// assert_eq!((t.year(), t.month(), t.day()), (2015, 9, 3));
/// assert_eq!((t.hour(), t.minute()), (0, 17));
///
/// assert!(parse_planned_time("soon", tz).is_err());
/// ```
pub fn parse_planned_time(text: &str, tz: Tz) -> Result<DateTime<Tz>, TimeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TimeError::new(text, "empty"));
    }

    match parse_locale_naive(trimmed) {
        LocaleParse::Parsed(naive) => resolve_local(naive, tz)
            .ok_or_else(|| TimeError::new(text, "local time does not exist")),
        LocaleParse::Invalid(reason) => Err(TimeError::new(text, reason)),
        LocaleParse::NotLocale => parse_generic(trimmed, tz)
            .ok_or_else(|| TimeError::new(text, "unrecognised date format")),
    }
}

/// Expand a year as written upstream: two-digit years pivot at 80.
///
/// ```
/// use bus_proxy::domain::expand_year;
///
/// assert_eq!(expand_year(15), 2015);
/// assert_eq!(expand_year(85), 1985);
/// assert_eq!(expand_year(2031), 2031);
/// ```
pub fn expand_year(year: i32) -> i32 {
    if year >= 100 {
        year
    } else if year < TWO_DIGIT_YEAR_PIVOT {
        2000 + year
    } else {
        1900 + year
    }
}

/// Resolve a wall-clock time in `tz`.
///
/// Ambiguous times (the repeated hour in autumn) resolve to the earlier
/// instant. Times inside the spring-forward gap are moved one hour later.
pub fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}

/// Midnight at the start of `date` in `tz`.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Tz>> {
    resolve_local(date.and_hms_opt(0, 0, 0)?, tz)
}

/// Midnight at the start of the day after `now`, in `now`'s zone.
pub fn end_of_local_day(now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    local_midnight(now.date_naive().succ_opt()?, now.timezone())
}

/// Format an instant as the `xs:dateTime`-style local text the service
/// expects in request parameters (`YYYY-MM-DDTHH:MM:SS`, no offset).
pub fn format_request_time(t: &DateTime<Tz>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S").to_string()
}

enum LocaleParse {
    Parsed(NaiveDateTime),
    Invalid(&'static str),
    NotLocale,
}

/// Match `^(\d{1,2})\.(\d{1,2})\.(\d{2,4})\s+(\d{1,2}):(\d{2})$`.
fn parse_locale_naive(s: &str) -> LocaleParse {
    let mut parts = s.split_whitespace();
    let (Some(date_part), Some(time_part), None) = (parts.next(), parts.next(), parts.next())
    else {
        return LocaleParse::NotLocale;
    };

    let date_fields: Vec<&str> = date_part.split('.').collect();
    let time_fields: Vec<&str> = time_part.split(':').collect();
    let ([day, month, year], [hour, minute]) = (date_fields.as_slice(), time_fields.as_slice())
    else {
        return LocaleParse::NotLocale;
    };

    let (Some(day), Some(month), Some(year), Some(hour), Some(minute)) = (
        digits(day, 1, 2),
        digits(month, 1, 2),
        digits(year, 2, 4),
        digits(hour, 1, 2),
        digits(minute, 2, 2),
    ) else {
        return LocaleParse::NotLocale;
    };

    let Some(date) = NaiveDate::from_ymd_opt(expand_year(year as i32), month, day) else {
        return LocaleParse::Invalid("no such calendar date");
    };
    match date.and_hms_opt(hour, minute, 0) {
        Some(naive) => LocaleParse::Parsed(naive),
        None => LocaleParse::Invalid("no such time of day"),
    }
}

/// Parse an all-ASCII-digit field whose length is within `min..=max`.
fn digits(s: &str, min: usize, max: usize) -> Option<u32> {
    if s.len() < min || s.len() > max || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_generic(s: &str, tz: Tz) -> Option<DateTime<Tz>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&tz));
    }
    GENERIC_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .and_then(|naive| resolve_local(naive, tz))
}
