use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::date_range::DateRange;

/// A project phase shown on the timeline (`Gantt chart` list).
///
/// Linked to its cost center loosely, by project number rather than id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    #[serde(rename = "Id", deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(rename = "Title", deserialize_with = "lenient::text", default)]
    pub title: String,
    #[serde(
        rename = "KostenstelleNr",
        deserialize_with = "lenient::opt_text",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_center_nr: Option<String>,
    #[serde(rename = "StartDatum", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(rename = "EndeDatum", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// Progress in percent
    #[serde(
        rename = "Fortschritt",
        deserialize_with = "lenient::opt_number",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub progress: Option<f64>,
}

impl TimelineItem {
    pub fn range(&self) -> Option<DateRange> {
        Some(DateRange {
            from: self.start?,
            to: self.end?,
        })
    }

    /// Items without both dates are never active.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.range().is_some_and(|r| r.contains(day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_day;
    use serde_json::json;

    #[test]
    fn test_active_range() {
        let item: TimelineItem = serde_json::from_value(json!({
            "Id": 1, "Title": "Erdarbeiten", "KostenstelleNr": "24.002",
            "StartDatum": "2026-03-02", "EndeDatum": "2026-03-20", "Fortschritt": 40
        }))
        .unwrap();

        assert!(item.is_active_on(parse_day("2026-03-20").unwrap()));
        assert!(!item.is_active_on(parse_day("2026-03-21").unwrap()));
        assert_eq!(item.progress, Some(40.0));
    }

    #[test]
    fn test_item_without_dates() {
        let item: TimelineItem =
            serde_json::from_value(json!({ "Id": 2, "Title": "offen" })).unwrap();
        assert!(item.range().is_none());
        assert!(!item.is_active_on(parse_day("2026-03-20").unwrap()));
    }
}
