use serde::{Deserialize, Serialize};

use super::lenient;

/// An employee row of the `Mitarbeiter` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "Id", deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(rename = "PersNr", deserialize_with = "lenient::text", default)]
    pub pers_nr: String,
    /// Last name (the list's `Title` column)
    #[serde(rename = "Title", deserialize_with = "lenient::text", default)]
    pub name: String,
    #[serde(
        rename = "Vorname",
        deserialize_with = "lenient::opt_text",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub first_name: Option<String>,
    #[serde(rename = "Gruppe", deserialize_with = "lenient::text", default)]
    pub group: String,
    #[serde(
        rename = "Notizen",
        deserialize_with = "lenient::opt_text",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    /// Annual leave allowance in days
    #[serde(rename = "Urlaubstage", deserialize_with = "lenient::count", default)]
    pub leave_days: u32,
    #[serde(
        rename = "Aktiv",
        deserialize_with = "lenient::flag",
        default = "lenient::default_true"
    )]
    pub active: bool,
}

impl Employee {
    /// "Vorname Title", or just the last name when no first name is stored.
    pub fn display_name(&self) -> String {
        match &self.first_name {
            Some(first) => format!("{} {}", first, self.name),
            None => self.name.clone(),
        }
    }
}
