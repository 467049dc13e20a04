//! REST bodies shared by the proxy server and its clients.
//!
//! Lists come back wrapped as `{ "value": [...] }`, plain mutations answer
//! `{ "success": true }` and failures `{ "error": "..." }`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlanerError, PlanerResult};
use crate::model::{Absence, AbsenceType};

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub value: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(value: Vec<T>) -> Self {
        ListResponse { value }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        SuccessResponse { success: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(rename = "tokenOk")]
    pub token_ok: bool,
    #[serde(rename = "listsAvailable", default)]
    pub lists_available: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

/// Answer to an absence upsert that hit an existing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsenceUpdated {
    #[serde(rename = "Id")]
    pub id: u64,
    pub updated: bool,
}

/// Answer to `POST /abwesenheiten`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SetAbsenceResponse {
    Updated(AbsenceUpdated),
    Created(Absence),
    Batch(ListResponse<Absence>),
}

// =============================================================================
// Queries
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbsenceQuery {
    pub von: Option<NaiveDate>,
    pub bis: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineQuery {
    #[serde(rename = "kstNr")]
    pub kst_nr: Option<String>,
}

// =============================================================================
// Requests
// =============================================================================

fn require(field: &str, value: &str) -> PlanerResult<()> {
    if value.trim().is_empty() {
        return Err(PlanerError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    #[serde(rename = "Title")]
    pub name: String,
    #[serde(rename = "PersNr")]
    pub pers_nr: String,
    #[serde(rename = "Gruppe")]
    pub group: String,
    #[serde(rename = "Vorname", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "Notizen", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "Urlaubstage", default, skip_serializing_if = "Option::is_none")]
    pub leave_days: Option<u32>,
}

impl NewEmployee {
    pub fn validate(&self) -> PlanerResult<()> {
        require("Title", &self.name)?;
        require("PersNr", &self.pers_nr)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeePatch {
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "PersNr", default, skip_serializing_if = "Option::is_none")]
    pub pers_nr: Option<String>,
    #[serde(rename = "Vorname", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "Gruppe", default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(rename = "Notizen", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "Urlaubstage", default, skip_serializing_if = "Option::is_none")]
    pub leave_days: Option<u32>,
    #[serde(rename = "Aktiv", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Set one person's absence for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetAbsence {
    #[serde(rename = "PersNr")]
    pub pers_nr: String,
    #[serde(rename = "Datum")]
    pub date: NaiveDate,
    #[serde(rename = "Typ")]
    pub kind: AbsenceType,
}

impl SetAbsence {
    pub fn validate(&self) -> PlanerResult<()> {
        require("PersNr", &self.pers_nr)
    }

    pub fn natural_key(&self) -> String {
        Absence::natural_key(&self.pers_nr, self.date)
    }
}

/// Body of `POST /abwesenheiten`: one upsert or a batch of creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AbsenceRequest {
    Batch(Vec<SetAbsence>),
    Single(SetAbsence),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostCenterPatch {
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Aktiv", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "Bauleiter", default, skip_serializing_if = "Option::is_none")]
    pub site_manager: Option<String>,
    #[serde(rename = "Auftraggeber", default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(rename = "StartDatum", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(rename = "EndeDatum", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCrew {
    #[serde(rename = "Title")]
    pub name: String,
    #[serde(rename = "Polier", default, skip_serializing_if = "Option::is_none")]
    pub foreman: Option<String>,
}

impl NewCrew {
    pub fn validate(&self) -> PlanerResult<()> {
        require("Title", &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrewPatch {
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Polier", default, skip_serializing_if = "Option::is_none")]
    pub foreman: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    #[serde(rename = "PersNr")]
    pub pers_nr: String,
}

impl NewMember {
    pub fn validate(&self) -> PlanerResult<()> {
        require("PersNr", &self.pers_nr)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignment {
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "KolonneId")]
    pub crew_id: u64,
    #[serde(rename = "KostenstelleId")]
    pub cost_center_id: u64,
    #[serde(rename = "Von")]
    pub from: NaiveDate,
    #[serde(rename = "Bis")]
    pub to: NaiveDate,
}

impl NewAssignment {
    pub fn validate(&self) -> PlanerResult<()> {
        if self.from > self.to {
            return Err(PlanerError::InvalidRange {
                from: self.from.to_string(),
                to: self.to.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentPatch {
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "KolonneId", default, skip_serializing_if = "Option::is_none")]
    pub crew_id: Option<u64>,
    #[serde(rename = "KostenstelleId", default, skip_serializing_if = "Option::is_none")]
    pub cost_center_id: Option<u64>,
    #[serde(rename = "Von", default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(rename = "Bis", default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl AssignmentPatch {
    pub fn validate(&self) -> PlanerResult<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(PlanerError::InvalidRange {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimelineItem {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "KostenstelleNr", default, skip_serializing_if = "Option::is_none")]
    pub cost_center_nr: Option<String>,
    #[serde(rename = "StartDatum")]
    pub start: NaiveDate,
    #[serde(rename = "EndeDatum")]
    pub end: NaiveDate,
    #[serde(rename = "Fortschritt", default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl NewTimelineItem {
    pub fn validate(&self) -> PlanerResult<()> {
        require("Title", &self.title)?;
        if self.start > self.end {
            return Err(PlanerError::InvalidRange {
                from: self.start.to_string(),
                to: self.end.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelinePatch {
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "KostenstelleNr", default, skip_serializing_if = "Option::is_none")]
    pub cost_center_nr: Option<String>,
    #[serde(rename = "StartDatum", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(rename = "EndeDatum", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(rename = "Fortschritt", default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl TimelinePatch {
    pub fn validate(&self) -> PlanerResult<()> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(PlanerError::InvalidRange {
                    from: start.to_string(),
                    to: end.to_string(),
                });
            }
        }
        Ok(())
    }
}
