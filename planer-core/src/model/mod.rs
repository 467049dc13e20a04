//! List entities.
//!
//! Field names on the wire are the German column names the frontend and the
//! list store use (`PersNr`, `Datum`, `KolonneId`, ...). The Rust side uses
//! English names; serde renames bridge the two.

mod absence;
mod assignment;
mod cost_center;
mod crew;
mod employee;
mod timeline;

pub use absence::{Absence, AbsenceType};
pub use assignment::Assignment;
pub use cost_center::{CostCenter, project_number};
pub use crew::{Crew, CrewMember};
pub use employee::Employee;
pub use timeline::TimelineItem;

/// Deserializers tolerant of how the list store hands back values:
/// numbers as floats, empty strings instead of nulls, nulls for defaults.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(d)?;
        number(&value)
            .filter(|n| *n >= 0.0)
            .map(|n| n as u64)
            .ok_or_else(|| serde::de::Error::custom(format!("expected numeric id, got {value}")))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(number(&value).map(|n| n.max(0.0).round() as u32).unwrap_or(0))
    }

    pub fn opt_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(number(&value))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<String>::deserialize(d)?.filter(|s| !s.trim().is_empty()))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(match value {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => matches!(s.as_str(), "1" | "true" | "True"),
            _ => true,
        })
    }

    pub fn default_true() -> bool {
        true
    }
}
