//! Inclusive day ranges used for assignments, timeline items and query windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{self, parse_day};
use crate::error::{PlanerError, PlanerResult};

/// An inclusive range of days: `from <= day <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> PlanerResult<Self> {
        if from > to {
            return Err(PlanerError::InvalidRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(DateRange { from, to })
    }

    /// The whole calendar month containing `day`.
    pub fn month_of(day: NaiveDate) -> Self {
        let days = dates::month_dates_of(day);
        // A month always has at least 28 days
        DateRange {
            from: days[0],
            to: days[days.len() - 1],
        }
    }

    /// Build a range from CLI/query arguments.
    /// - both missing: the month containing `today`
    /// - only `from`: from that day to the end of its month
    /// - only `to`: from the start of that day's month
    pub fn from_args(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> PlanerResult<Self> {
        let from = from.map(parse_day).transpose()?;
        let to = to.map(parse_day).transpose()?;

        match (from, to) {
            (Some(from), Some(to)) => DateRange::new(from, to),
            (Some(from), None) => Ok(DateRange {
                from,
                to: DateRange::month_of(from).to,
            }),
            (None, Some(to)) => Ok(DateRange {
                from: DateRange::month_of(to).from,
                to,
            }),
            (None, None) => Ok(DateRange::month_of(today)),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }

    /// True if the two ranges share at least one day.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.from <= other.to && self.to >= other.from
    }

    /// Every day in the range, in order.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.from.iter_days().take_while(|d| *d <= self.to).collect()
    }

    /// Number of days covered, counting both ends.
    pub fn len_days(&self) -> i64 {
        dates::days_between(self.from, self.to) + 1
    }
}
