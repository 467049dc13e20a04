//! The SharePoint lists behind each entity and how their fields map to the
//! REST field names.
//!
//! Some columns were renamed in the lists (`Bauleiter0`, `Polier0`,
//! `Startdatum`) while clients keep the api names. Dates come back as
//! timestamps and are cut to `YYYY-MM-DD`.

use serde_json::Value;

use crate::store::{ListQuery, Row};

pub struct ListDef {
    pub title: &'static str,
    pub select: &'static str,
    pub order_by: Option<&'static str>,
    /// `(api name, store name)` pairs
    pub aliases: &'static [(&'static str, &'static str)],
    /// Date fields, by api name
    pub dates: &'static [&'static str],
}

pub const EMPLOYEES: ListDef = ListDef {
    title: "Mitarbeiter",
    select: "Id,Title,PersNr,Gruppe,Notizen,Urlaubstage,Aktiv",
    order_by: Some("Gruppe,Title"),
    aliases: &[],
    dates: &[],
};

/// Column holding first names. Deployed lists do not have it; it is only
/// read and written when `first_name_column` is configured.
pub const EMPLOYEE_FIRST_NAME: &str = "Vorname";

/// [`EMPLOYEES`] read for lists that have the `Vorname` column.
pub const EMPLOYEES_SELECT_WITH_FIRST_NAME: &str =
    "Id,Title,PersNr,Vorname,Gruppe,Notizen,Urlaubstage,Aktiv";

pub const ABSENCES: ListDef = ListDef {
    title: "Abwesenheiten",
    select: "Id,Title,PersNr,Datum,Typ",
    order_by: Some("PersNr,Datum"),
    aliases: &[],
    dates: &["Datum"],
};

pub const COST_CENTERS: ListDef = ListDef {
    title: "Kostenstellen",
    select: "Id,Title,Aktiv,Bauleiter0,Auftraggeber,StartDatum,EndeDatum",
    order_by: Some("Title"),
    aliases: &[("Bauleiter", "Bauleiter0")],
    dates: &["StartDatum", "EndeDatum"],
};

pub const CREWS: ListDef = ListDef {
    title: "Kolonnen",
    select: "Id,Title,Polier0",
    order_by: Some("Title"),
    aliases: &[("Polier", "Polier0")],
    dates: &[],
};

pub const CREW_MEMBERS: ListDef = ListDef {
    title: "KolonneMitglieder",
    select: "Id,Title,KolonneId,PersNr",
    order_by: Some("KolonneId"),
    aliases: &[],
    dates: &[],
};

pub const ASSIGNMENTS: ListDef = ListDef {
    title: "Zuweisungen",
    select: "Id,Title,KolonneId,KostenstelleId,Von,Bis",
    order_by: Some("Von"),
    aliases: &[],
    dates: &["Von", "Bis"],
};

pub const TIMELINE: ListDef = ListDef {
    title: "Gantt chart",
    select: "Id,Title,KostenstelleNr,Startdatum,Enddatum,Fortschritt",
    order_by: Some("Startdatum"),
    aliases: &[("StartDatum", "Startdatum"), ("EndeDatum", "Enddatum")],
    dates: &["StartDatum", "EndeDatum"],
};

impl ListDef {
    /// The full read of this list, optionally narrowed further by the caller.
    pub fn query(&self) -> ListQuery {
        let query = ListQuery::new(self.select);
        match self.order_by {
            Some(order_by) => query.order_by(order_by),
            None => query,
        }
    }

    /// Store row to api row. Aliased fields are always present, `null` when
    /// the store left them out.
    pub fn to_api(&self, mut row: Row) -> Row {
        for (api, store) in self.aliases {
            let value = row.remove(*store).unwrap_or(Value::Null);
            row.insert(api.to_string(), value);
        }

        for field in self.dates {
            if let Some(value) = row.get_mut(*field) {
                *value = normalize_date(value);
            }
        }

        row
    }

    /// Api row (create body or patch) to store row.
    pub fn to_store(&self, mut row: Row) -> Row {
        for (api, store) in self.aliases {
            if let Some(value) = row.remove(*api) {
                row.insert(store.to_string(), value);
            }
        }
        row
    }
}

fn normalize_date(value: &Value) -> Value {
    match value {
        Value::String(s) if s.trim().is_empty() => Value::Null,
        Value::String(s) => Value::String(s.chars().take(10).collect()),
        other => other.clone(),
    }
}
