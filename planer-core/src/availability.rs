//! Crew availability: how many members can work on a given day.
//!
//! Every view that shows a crew percentage goes through [`availability`].

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::holidays::HolidayCalendar;
use crate::model::{Absence, AbsenceType, Crew};

/// Lookup over a loaded set of absences, keyed by (PersNr, day).
#[derive(Debug, Default, Clone)]
pub struct AbsenceIndex {
    by_key: HashMap<(String, NaiveDate), Absence>,
}

impl AbsenceIndex {
    /// Later rows win when the store holds duplicates for one key.
    pub fn new<'a>(absences: impl IntoIterator<Item = &'a Absence>) -> Self {
        let by_key = absences
            .into_iter()
            .map(|a| ((a.pers_nr.clone(), a.date), a.clone()))
            .collect();
        AbsenceIndex { by_key }
    }

    pub fn get(&self, pers_nr: &str, day: NaiveDate) -> Option<&Absence> {
        self.by_key.get(&(pers_nr.to_string(), day))
    }

    pub fn is_absent(&self, pers_nr: &str, day: NaiveDate) -> bool {
        self.get(pers_nr, day).is_some()
    }

    /// Personnel numbers with an absence on `day`.
    pub fn absent_on(&self, day: NaiveDate) -> HashSet<&str> {
        self.by_key
            .keys()
            .filter(|(_, d)| *d == day)
            .map(|(p, _)| p.as_str())
            .collect()
    }

    /// Absences on `day`, sorted by personnel number.
    pub fn on_day(&self, day: NaiveDate) -> Vec<&Absence> {
        let mut list: Vec<&Absence> = self.by_key.values().filter(|a| a.date == day).collect();
        list.sort_by(|a, b| a.pers_nr.cmp(&b.pers_nr));
        list
    }

    /// Number of absences of `kind` for one person in the loaded window.
    pub fn count_for(&self, pers_nr: &str, kind: AbsenceType) -> usize {
        self.by_key
            .values()
            .filter(|a| a.pers_nr == pers_nr && a.kind == kind)
            .count()
    }

    /// Vacation days (`U`) used by one person in the loaded window.
    pub fn vacation_days_used(&self, pers_nr: &str) -> usize {
        self.count_for(pers_nr, AbsenceType::Vacation)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Colour band for a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Green,
    Orange,
    Red,
}

impl Tier {
    pub fn for_percent(percent: u32) -> Self {
        if percent >= 80 {
            Tier::Green
        } else if percent >= 50 {
            Tier::Orange
        } else {
            Tier::Red
        }
    }

    /// Tier from the exact ratio, so 398 of 500 stays orange even though
    /// it rounds to 80%.
    pub fn for_counts(available: usize, total: usize) -> Self {
        if total == 0 {
            Tier::Red
        } else if available * 10 >= total * 8 {
            Tier::Green
        } else if available * 2 >= total {
            Tier::Orange
        } else {
            Tier::Red
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub total: usize,
    pub available: usize,
    pub percent: u32,
}

impl Availability {
    pub fn new(total: usize, available: usize) -> Self {
        Availability {
            total,
            available,
            percent: percent_of(available, total),
        }
    }

    pub fn tier(&self) -> Tier {
        Tier::for_percent(self.percent)
    }

    pub fn exact_tier(&self) -> Tier {
        Tier::for_counts(self.available, self.total)
    }
}

/// `round(part / total * 100)`, or 0 for an empty total.
pub fn percent_of(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

/// Availability of a set of personnel numbers on `day`.
///
/// Nobody is available on weekends and holidays.
pub fn availability_of<'a>(
    members: impl IntoIterator<Item = &'a str>,
    day: NaiveDate,
    absences: &AbsenceIndex,
    calendar: &HolidayCalendar,
) -> Availability {
    let members: Vec<&str> = members.into_iter().collect();
    let total = members.len();

    if !calendar.is_workday(day) {
        return Availability::new(total, 0);
    }

    let available = members
        .iter()
        .filter(|p| !absences.is_absent(p, day))
        .count();
    Availability::new(total, available)
}

pub fn availability(
    crew: &Crew,
    day: NaiveDate,
    absences: &AbsenceIndex,
    calendar: &HolidayCalendar,
) -> Availability {
    availability_of(crew.member_pers_nrs(), day, absences, calendar)
}

/// True if the person can work on `day`.
pub fn is_available(
    pers_nr: &str,
    day: NaiveDate,
    absences: &AbsenceIndex,
    calendar: &HolidayCalendar,
) -> bool {
    calendar.is_workday(day) && !absences.is_absent(pers_nr, day)
}
