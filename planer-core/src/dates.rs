//! Day helpers for the calendar grids.

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};

use crate::error::{PlanerError, PlanerResult};

const MONTH_NAMES: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];

/// Parse an ISO day. Timestamps coming back from the list store
/// (`2026-03-10T00:00:00Z`, `2026-03-10 08:00`) are cut to their date part;
/// any other trailing text is rejected.
pub fn parse_day(s: &str) -> PlanerResult<NaiveDate> {
    let invalid = || PlanerError::InvalidDate(s.to_string());
    let trimmed = s.trim();
    let day_part = match (trimmed.get(..10), trimmed.get(10..)) {
        (Some(day), Some(rest)) if rest.is_empty() || rest.starts_with(['T', ' ']) => day,
        (Some(_), _) => return Err(invalid()),
        (None, _) => trimmed,
    };
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").map_err(|_| invalid())
}

/// Today in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// All days of the given month (`month` is 1-based).
pub fn month_dates(year: i32, month: u32) -> PlanerResult<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| PlanerError::InvalidDate(format!("{year}-{month:02}")))?;
    Ok(month_dates_of(first))
}

/// All days of the month containing `day`.
pub fn month_dates_of(day: NaiveDate) -> Vec<NaiveDate> {
    let first = day.with_day(1).unwrap_or(day);
    first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .collect()
}

/// `weeks * 7` consecutive days starting at `start`.
pub fn week_dates(start: NaiveDate, weeks: u32) -> Vec<NaiveDate> {
    start.iter_days().take(weeks as usize * 7).collect()
}

/// Monday of the week containing `day`.
pub fn monday_of(day: NaiveDate) -> NaiveDate {
    let offset = day.weekday().num_days_from_monday() as u64;
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}

/// ISO 8601 week number.
pub fn week_number(day: NaiveDate) -> u32 {
    day.iso_week().week()
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// German month name (`month` is 1-based).
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

/// Two-letter German weekday label ("Mo", "Di", ...).
pub fn weekday_short(day: NaiveDate) -> &'static str {
    match day.weekday() {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Di",
        Weekday::Wed => "Mi",
        Weekday::Thu => "Do",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "So",
    }
}

/// "10.03." style label used in grid headers.
pub fn format_short(day: NaiveDate) -> String {
    day.format("%d.%m.").to_string()
}

/// "10.03.2026" style label.
pub fn format_full(day: NaiveDate) -> String {
    day.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn test_parse_day_accepts_store_timestamps() {
        assert_eq!(day("2026-03-10T00:00:00Z"), day("2026-03-10"));
        assert_eq!(day("2026-03-10 08:00"), day("2026-03-10"));
        assert!(parse_day("10.03.2026").is_err());
        assert!(parse_day("").is_err());
    }

    #[test]
    fn test_parse_day_rejects_trailing_garbage() {
        assert!(matches!(parse_day("2026-03-10xyz"), Err(PlanerError::InvalidDate(_))));
        assert!(parse_day("2026-03-100").is_err());
    }

    #[test]
    fn test_month_dates() {
        assert_eq!(month_dates(2026, 2).unwrap().len(), 28);
        assert_eq!(month_dates(2028, 2).unwrap().len(), 29);
        let march = month_dates(2026, 3).unwrap();
        assert_eq!(march.len(), 31);
        assert_eq!(march[0], day("2026-03-01"));
        assert!(month_dates(2026, 13).is_err());
    }

    #[test]
    fn test_monday_of() {
        assert_eq!(monday_of(day("2026-03-10")), day("2026-03-09"));
        assert_eq!(monday_of(day("2026-03-09")), day("2026-03-09"));
        assert_eq!(monday_of(day("2026-03-15")), day("2026-03-09"));
    }

    #[test]
    fn test_week_dates_spans_four_weeks() {
        let dates = week_dates(day("2026-03-09"), 4);
        assert_eq!(dates.len(), 28);
        assert_eq!(dates[27], day("2026-04-05"));
    }

    #[test]
    fn test_week_number() {
        assert_eq!(week_number(day("2026-01-01")), 1);
        assert_eq!(week_number(day("2026-03-10")), 11);
        assert_eq!(week_number(day("2027-01-01")), 53);
    }

    #[test]
    fn test_weekend() {
        assert!(!is_weekend(day("2026-03-10")));
        assert!(is_weekend(day("2026-03-14")));
        assert!(is_weekend(day("2026-03-15")));
    }

    #[test]
    fn test_labels() {
        assert_eq!(month_name(3), "März");
        assert_eq!(month_name(0), "?");
        assert_eq!(weekday_short(day("2026-03-10")), "Di");
        assert_eq!(format_short(day("2026-03-10")), "10.03.");
    }
}
