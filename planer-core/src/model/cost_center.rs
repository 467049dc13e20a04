use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::date_range::DateRange;

/// A construction project (`Kostenstellen` list).
///
/// The title carries the project number followed by the name,
/// e.g. `"24.002 DU-Am Unkelstein (Netze DU)"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCenter {
    #[serde(rename = "Id", deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(rename = "Title", deserialize_with = "lenient::text", default)]
    pub title: String,
    #[serde(
        rename = "Aktiv",
        deserialize_with = "lenient::flag",
        default = "lenient::default_true"
    )]
    pub active: bool,
    #[serde(
        rename = "Bauleiter",
        deserialize_with = "lenient::opt_text",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub site_manager: Option<String>,
    #[serde(
        rename = "Auftraggeber",
        deserialize_with = "lenient::opt_text",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client: Option<String>,
    #[serde(rename = "StartDatum", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(rename = "EndeDatum", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl CostCenter {
    /// Project number: the title up to the first space.
    pub fn number(&self) -> &str {
        project_number(&self.title)
    }

    /// Project name without the number prefix.
    pub fn name(&self) -> &str {
        match self.title.split_once(' ') {
            Some((_, rest)) => rest.trim(),
            None => &self.title,
        }
    }

    /// Planned project period, when both ends are set.
    pub fn period(&self) -> Option<DateRange> {
        DateRange::new(self.start?, self.end?).ok()
    }
}

/// Extract the project number from a `"NR Name"` title.
pub fn project_number(title: &str) -> &str {
    title.split(' ').next().unwrap_or_default()
}
