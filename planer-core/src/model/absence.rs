use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::error::PlanerError;

/// The eight absence codes stored in the `Typ` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbsenceType {
    /// Urlaub
    #[serde(rename = "U")]
    Vacation,
    /// Krank
    #[serde(rename = "K")]
    Sick,
    /// Fehlt entschuldigt
    #[serde(rename = "FE")]
    Excused,
    /// Praktikum
    #[serde(rename = "P")]
    Internship,
    /// Schule
    #[serde(rename = "S")]
    School,
    /// Halbtag
    #[serde(rename = "H")]
    HalfDay,
    /// Urlaub nachmittags
    #[serde(rename = "UN")]
    AfternoonVacation,
    /// Betriebsurlaub
    #[serde(rename = "BU")]
    CompanyShutdown,
}

impl AbsenceType {
    pub const ALL: [AbsenceType; 8] = [
        AbsenceType::Vacation,
        AbsenceType::Sick,
        AbsenceType::Excused,
        AbsenceType::Internship,
        AbsenceType::School,
        AbsenceType::HalfDay,
        AbsenceType::AfternoonVacation,
        AbsenceType::CompanyShutdown,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AbsenceType::Vacation => "U",
            AbsenceType::Sick => "K",
            AbsenceType::Excused => "FE",
            AbsenceType::Internship => "P",
            AbsenceType::School => "S",
            AbsenceType::HalfDay => "H",
            AbsenceType::AfternoonVacation => "UN",
            AbsenceType::CompanyShutdown => "BU",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AbsenceType::Vacation => "Urlaub",
            AbsenceType::Sick => "Krank",
            AbsenceType::Excused => "Fehlt entschuldigt",
            AbsenceType::Internship => "Praktikum",
            AbsenceType::School => "Schule",
            AbsenceType::HalfDay => "Halbtag",
            AbsenceType::AfternoonVacation => "Urlaub nachmittags",
            AbsenceType::CompanyShutdown => "Betriebsurlaub",
        }
    }
}

impl fmt::Display for AbsenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AbsenceType {
    type Err = PlanerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        AbsenceType::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| PlanerError::InvalidAbsenceType(s.to_string()))
    }
}

/// One employee's absence on one day (`Abwesenheiten` list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Absence {
    #[serde(rename = "Id", deserialize_with = "lenient::id")]
    pub id: u64,
    /// Natural key, `"{PersNr}-{Datum}"`
    #[serde(rename = "Title", deserialize_with = "lenient::text", default)]
    pub title: String,
    #[serde(rename = "PersNr", deserialize_with = "lenient::text", default)]
    pub pers_nr: String,
    #[serde(rename = "Datum")]
    pub date: NaiveDate,
    #[serde(rename = "Typ")]
    pub kind: AbsenceType,
}

impl Absence {
    /// The natural key used as list title and for the existence check.
    pub fn natural_key(pers_nr: &str, date: NaiveDate) -> String {
        format!("{}-{}", pers_nr, date.format("%Y-%m-%d"))
    }

    pub fn key(&self) -> String {
        Absence::natural_key(&self.pers_nr, self.date)
    }
}
