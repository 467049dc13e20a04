//! Public holidays and company shutdown days.
//!
//! Holidays and weekends are never working days: availability is zero and the
//! absence grid refuses to paint them. Shutdown days are ordinary working days
//! in the calendar; they show up as `BU` absences instead.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::dates::{self, parse_day};
use crate::error::PlanerResult;

const HOLIDAYS_2026: &[(&str, &str)] = &[
    ("2026-01-01", "Neujahr"),
    ("2026-02-16", "Rosenmontag"),
    ("2026-04-03", "Karfreitag"),
    ("2026-04-06", "Ostermontag"),
    ("2026-05-01", "Tag der Arbeit"),
    ("2026-05-14", "Christi Himmelfahrt"),
    ("2026-05-25", "Pfingstmontag"),
    ("2026-06-04", "Fronleichnam"),
    ("2026-10-03", "Tag der Deutschen Einheit"),
    ("2026-11-01", "Allerheiligen"),
    ("2026-12-25", "1. Weihnachtstag"),
    ("2026-12-26", "2. Weihnachtstag"),
    ("2026-12-31", "Silvester"),
    ("2027-01-01", "Neujahr"),
];

const SHUTDOWN_2026: &[&str] = &["2026-01-02", "2026-02-17", "2026-05-15", "2026-06-05"];

#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    holidays: BTreeMap<NaiveDate, String>,
    shutdown: BTreeSet<NaiveDate>,
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        let holidays = HOLIDAYS_2026
            .iter()
            .filter_map(|(day, name)| Some((parse_day(day).ok()?, name.to_string())))
            .collect();
        let shutdown = SHUTDOWN_2026
            .iter()
            .filter_map(|day| parse_day(day).ok())
            .collect();

        HolidayCalendar { holidays, shutdown }
    }
}

impl HolidayCalendar {
    /// A calendar without any holidays (weekends still count).
    pub fn empty() -> Self {
        HolidayCalendar {
            holidays: BTreeMap::new(),
            shutdown: BTreeSet::new(),
        }
    }

    pub fn add_holiday(&mut self, day: &str, name: &str) -> PlanerResult<()> {
        self.holidays.insert(parse_day(day)?, name.to_string());
        Ok(())
    }

    pub fn add_shutdown_day(&mut self, day: &str) -> PlanerResult<()> {
        self.shutdown.insert(parse_day(day)?);
        Ok(())
    }

    pub fn is_holiday(&self, day: NaiveDate) -> bool {
        self.holidays.contains_key(&day)
    }

    pub fn holiday_name(&self, day: NaiveDate) -> Option<&str> {
        self.holidays.get(&day).map(String::as_str)
    }

    pub fn is_company_shutdown(&self, day: NaiveDate) -> bool {
        self.shutdown.contains(&day)
    }

    pub fn is_weekend(&self, day: NaiveDate) -> bool {
        dates::is_weekend(day)
    }

    /// Neither a weekend nor a holiday.
    pub fn is_workday(&self, day: NaiveDate) -> bool {
        !self.is_weekend(day) && !self.is_holiday(day)
    }

    /// Holidays falling inside the given days, in order.
    pub fn holidays_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<(NaiveDate, &str)> {
        self.holidays
            .range(from..=to)
            .map(|(day, name)| (*day, name.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn test_default_calendar() {
        let cal = HolidayCalendar::default();
        assert!(cal.is_holiday(day("2026-01-01")));
        assert_eq!(cal.holiday_name(day("2026-04-03")), Some("Karfreitag"));
        assert!(!cal.is_holiday(day("2026-03-10")));
        assert!(cal.is_company_shutdown(day("2026-02-17")));
    }

    #[test]
    fn test_workday() {
        let cal = HolidayCalendar::default();
        assert!(cal.is_workday(day("2026-03-10")));
        assert!(!cal.is_workday(day("2026-03-14")));
        assert!(!cal.is_workday(day("2026-05-01")));
        // Shutdown days are still working days in the calendar
        assert!(cal.is_workday(day("2026-01-02")));
    }

    #[test]
    fn test_add_holiday() {
        let mut cal = HolidayCalendar::empty();
        assert!(cal.is_workday(day("2026-03-10")));
        cal.add_holiday("2026-03-10", "Betriebsfeier").unwrap();
        assert!(!cal.is_workday(day("2026-03-10")));
        assert!(cal.add_holiday("soon", "x").is_err());
    }

    #[test]
    fn test_holidays_between() {
        let cal = HolidayCalendar::default();
        let may = cal.holidays_between(day("2026-05-01"), day("2026-05-31"));
        let names: Vec<&str> = may.iter().map(|(_, n)| *n).collect();
        assert_eq!(names, vec!["Tag der Arbeit", "Christi Himmelfahrt", "Pfingstmontag"]);
    }
}
