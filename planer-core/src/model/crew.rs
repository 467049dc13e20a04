use serde::{Deserialize, Serialize};

use super::lenient;

/// A work crew (`Kolonnen` list) with its members attached.
///
/// `members` is not a list column: the proxy fills it from the
/// `KolonneMitglieder` list on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crew {
    #[serde(rename = "Id", deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(rename = "Title", deserialize_with = "lenient::text", default)]
    pub name: String,
    /// Foreman (`Polier`)
    #[serde(
        rename = "Polier",
        deserialize_with = "lenient::opt_text",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub foreman: Option<String>,
    #[serde(rename = "Mitglieder", default)]
    pub members: Vec<CrewMember>,
}

/// One membership row (`KolonneMitglieder` list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    #[serde(rename = "Id", deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(rename = "KolonneId", deserialize_with = "lenient::id")]
    pub crew_id: u64,
    #[serde(rename = "PersNr", deserialize_with = "lenient::text", default)]
    pub pers_nr: String,
}

impl CrewMember {
    /// List title of a membership row, `"{KolonneId}-{PersNr}"`.
    pub fn title_for(crew_id: u64, pers_nr: &str) -> String {
        format!("{}-{}", crew_id, pers_nr)
    }
}

impl Crew {
    pub fn has_member(&self, pers_nr: &str) -> bool {
        self.members.iter().any(|m| m.pers_nr == pers_nr)
    }

    pub fn member_pers_nrs(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.pers_nr.as_str())
    }

    /// The first crew the person belongs to.
    pub fn of_person<'a>(crews: &'a [Crew], pers_nr: &str) -> Option<&'a Crew> {
        crews.iter().find(|c| c.has_member(pers_nr))
    }
}
