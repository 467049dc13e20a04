pub mod absences;
pub mod assignments;
pub mod cost_centers;
pub mod crews;
pub mod dashboard;
pub mod employees;
pub mod health;
pub mod overview;
pub mod planning;
pub mod timeline;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use planer_core::date_range::DateRange;
use planer_core::dates::{self, parse_day};

/// Weeks shown by the project overview.
pub const OVERVIEW_WEEKS: u32 = 4;

/// `--date`, defaulting to today.
pub fn day_arg(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => Ok(parse_day(s)?),
        None => Ok(dates::today()),
    }
}

/// `--month YYYY-MM`, defaulting to the current month.
pub fn month_arg(month: Option<&str>) -> Result<DateRange> {
    let Some(month) = month else {
        return Ok(DateRange::month_of(dates::today()));
    };

    let (year, number) = month
        .split_once('-')
        .and_then(|(y, m)| Some((y.parse::<i32>().ok()?, m.parse::<u32>().ok()?)))
        .with_context(|| format!("Invalid month '{}'. Expected YYYY-MM", month))?;

    let days = dates::month_dates(year, number)
        .with_context(|| format!("Invalid month '{}'. Expected YYYY-MM", month))?;
    match (days.first(), days.last()) {
        (Some(from), Some(to)) => Ok(DateRange::new(*from, *to)?),
        _ => anyhow::bail!("Invalid month '{}'. Expected YYYY-MM", month),
    }
}
