use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::date_range::DateRange;

/// A crew assigned to a cost center for an inclusive range of days
/// (`Zuweisungen` list).
///
/// Overlapping assignments for the same crew are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "Id", deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(rename = "Title", deserialize_with = "lenient::text", default)]
    pub title: String,
    #[serde(rename = "KolonneId", deserialize_with = "lenient::id")]
    pub crew_id: u64,
    #[serde(rename = "KostenstelleId", deserialize_with = "lenient::id")]
    pub cost_center_id: u64,
    #[serde(rename = "Von")]
    pub from: NaiveDate,
    #[serde(rename = "Bis")]
    pub to: NaiveDate,
}

impl Assignment {
    /// Default list title, `"{KolonneId}-{KostenstelleId}"`.
    pub fn default_title(crew_id: u64, cost_center_id: u64) -> String {
        format!("{}-{}", crew_id, cost_center_id)
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            from: self.from,
            to: self.to,
        }
    }

    /// `from <= day <= to`.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.range().contains(day)
    }

    pub fn overlaps(&self, window: &DateRange) -> bool {
        self.range().overlaps(window)
    }

    /// Assignments covering `day`, in input order.
    pub fn active_on(assignments: &[Assignment], day: NaiveDate) -> Vec<&Assignment> {
        assignments.iter().filter(|a| a.is_active_on(day)).collect()
    }

    /// The assignment of `crew_id` covering `day`, if any.
    pub fn for_crew_on(assignments: &[Assignment], crew_id: u64, day: NaiveDate) -> Option<&Assignment> {
        assignments
            .iter()
            .find(|a| a.crew_id == crew_id && a.is_active_on(day))
    }
}
