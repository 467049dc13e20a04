//! Entity operations on top of a [`ListStore`].
//!
//! Rows are remapped to api field names and decoded into the core types.
//! Rows that do not decode are skipped with a warning rather than failing
//! the whole read.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{info, warn};

use planer_core::protocol::{
    AbsenceQuery, AssignmentPatch, CostCenterPatch, CrewPatch, EmployeePatch, NewAssignment,
    NewCrew, NewEmployee, NewMember, NewTimelineItem, SetAbsence, TimelinePatch,
};
use planer_core::{
    Absence, Assignment, CostCenter, Crew, CrewMember, Employee, PlanerError, TimelineItem,
};

use crate::lists::{
    ABSENCES, ASSIGNMENTS, COST_CENTERS, CREW_MEMBERS, CREWS, EMPLOYEE_FIRST_NAME, EMPLOYEES,
    EMPLOYEES_SELECT_WITH_FIRST_NAME, ListDef, TIMELINE,
};
use crate::locks::KeyedLocks;
use crate::store::{Filter, ListQuery, ListStore, Row, StoreError};

/// Result of a single absence upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum AbsenceWrite {
    /// A row for the person and day existed; its type now matches
    Updated(u64),
    Created(Absence),
}

pub struct Planer {
    store: Arc<dyn ListStore>,
    absence_locks: KeyedLocks,
    /// The employee list has a `Vorname` column
    first_name_column: bool,
}

fn row_id(row: &Row) -> Result<u64, StoreError> {
    row.get("Id")
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f as u64)))
        .ok_or_else(|| StoreError::Decode(format!("row without Id: {}", Value::Object(row.clone()))))
}

fn to_row(value: impl Serialize) -> Result<Row> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("Expected a JSON object, got {}", other),
    }
}

fn day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn decode_rows<T: DeserializeOwned>(def: &ListDef, rows: Vec<Row>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.get("Id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value(Value::Object(def.to_api(row))) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(list = def.title, id = %id, error = %e, "Skipping undecodable row");
                    None
                }
            }
        })
        .collect()
}

fn decode_row<T: DeserializeOwned>(def: &ListDef, row: Row) -> Result<T> {
    serde_json::from_value(Value::Object(def.to_api(row)))
        .map_err(|e| StoreError::Decode(format!("{}: {}", def.title, e)).into())
}

impl Planer {
    pub fn new(store: Arc<dyn ListStore>) -> Self {
        Planer {
            store,
            absence_locks: KeyedLocks::new(),
            first_name_column: false,
        }
    }

    pub fn with_first_name_column(mut self, enabled: bool) -> Self {
        self.first_name_column = enabled;
        self
    }

    async fn read<T: DeserializeOwned>(&self, def: &ListDef, query: ListQuery) -> Result<Vec<T>> {
        let rows = self.store.get_all(def.title, &query).await?;
        Ok(decode_rows(def, rows))
    }

    async fn create<T: DeserializeOwned>(&self, def: &ListDef, body: Row) -> Result<T> {
        let row = self.store.create(def.title, def.to_store(body)).await?;
        decode_row(def, row)
    }

    async fn merge(&self, def: &ListDef, id: u64, patch: impl Serialize) -> Result<()> {
        let patch = def.to_store(to_row(patch)?);
        self.store.merge(def.title, id, patch).await?;
        Ok(())
    }

    async fn delete(&self, def: &ListDef, id: u64) -> Result<()> {
        self.store.delete(def.title, id).await?;
        Ok(())
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Titles of the lists visible to the proxy. Fails when the token
    /// exchange or the site read fails.
    pub async fn list_titles(&self) -> Result<Vec<String>> {
        Ok(self.store.list_titles().await?)
    }

    // =========================================================================
    // Employees
    // =========================================================================

    fn employee_query(&self) -> ListQuery {
        let query = EMPLOYEES.query();
        if self.first_name_column {
            ListQuery {
                select: Some(EMPLOYEES_SELECT_WITH_FIRST_NAME),
                ..query
            }
        } else {
            query
        }
    }

    /// Without a `Vorname` column the first name goes in front of the title.
    fn place_first_name(&self, name: String, first_name: Option<String>) -> (String, Option<String>) {
        match first_name.filter(|f| !f.trim().is_empty()) {
            Some(first) if !self.first_name_column => (format!("{} {}", first.trim(), name), None),
            other => (name, other),
        }
    }

    /// Active employees, ordered by group and name.
    pub async fn employees(&self) -> Result<Vec<Employee>> {
        let query = self.employee_query().filter(Filter::eq("Aktiv", true));
        self.read(&EMPLOYEES, query).await
    }

    pub async fn create_employee(&self, req: NewEmployee) -> Result<Employee> {
        req.validate()?;
        let (title, first_name) = self.place_first_name(req.name, req.first_name);

        let mut body = to_row(json!({
            "Title": title,
            "PersNr": req.pers_nr,
            "Gruppe": req.group,
            "Notizen": req.notes.unwrap_or_default(),
            "Urlaubstage": req.leave_days.unwrap_or(0),
            "Aktiv": true,
        }))?;
        if let Some(first_name) = first_name {
            body.insert(EMPLOYEE_FIRST_NAME.into(), Value::String(first_name));
        }

        let employee: Employee = self.create(&EMPLOYEES, body).await?;
        info!(id = employee.id, pers_nr = %employee.pers_nr, "Employee created");
        Ok(employee)
    }

    /// A first name without a `Vorname` column can only be set together
    /// with the last name, since both end up in `Title`.
    pub async fn update_employee(&self, id: u64, mut patch: EmployeePatch) -> Result<()> {
        if !self.first_name_column {
            if let Some(first_name) = patch.first_name.take() {
                let Some(name) = patch.name.take() else {
                    return Err(PlanerError::Validation(
                        "Vorname can only be changed together with Title".into(),
                    )
                    .into());
                };
                patch.name = Some(self.place_first_name(name, Some(first_name)).0);
            }
        }
        self.merge(&EMPLOYEES, id, patch).await
    }

    // =========================================================================
    // Absences
    // =========================================================================

    /// Absences between `von` and `bis`, both inclusive and both optional.
    pub async fn absences(&self, range: &AbsenceQuery) -> Result<Vec<Absence>> {
        let from = range.von.map(|d| d.and_time(NaiveTime::MIN));
        let to = range.bis.and_then(|d| d.and_hms_opt(23, 59, 59));

        let filter = match (from, to) {
            (Some(from), Some(to)) => {
                if from > to {
                    return Err(PlanerError::InvalidRange {
                        from: from.date().to_string(),
                        to: to.date().to_string(),
                    }
                    .into());
                }
                Some(Filter::ge("Datum", from).and(Filter::le("Datum", to)))
            }
            (Some(from), None) => Some(Filter::ge("Datum", from)),
            (None, Some(to)) => Some(Filter::le("Datum", to)),
            (None, None) => None,
        };

        let mut query = ABSENCES.query();
        query.filter = filter;
        self.read(&ABSENCES, query).await
    }

    /// Upsert by natural key: at most one absence per person and day.
    ///
    /// Writes for the same key are serialized within this process.
    pub async fn set_absence(&self, req: SetAbsence) -> Result<AbsenceWrite> {
        req.validate()?;
        let key = req.natural_key();
        let _guard = self.absence_locks.lock(&key).await;

        let existing = self
            .store
            .get_all(
                ABSENCES.title,
                &ListQuery::new("Id,Title,Typ").filter(Filter::eq("Title", key.as_str())),
            )
            .await?;

        if let Some(row) = existing.first() {
            let id = row_id(row)?;
            if existing.len() > 1 {
                warn!(key = %key, rows = existing.len(), "Duplicate absences for one day");
            }

            if row.get("Typ").and_then(Value::as_str) != Some(req.kind.code()) {
                self.store
                    .merge(ABSENCES.title, id, to_row(json!({ "Typ": req.kind.code() }))?)
                    .await?;
                info!(key = %key, id, kind = req.kind.code(), "Absence updated");
            }
            return Ok(AbsenceWrite::Updated(id));
        }

        let absence = self.create_absence_row(&req, &key).await?;
        info!(key = %key, id = absence.id, kind = req.kind.code(), "Absence created");
        Ok(AbsenceWrite::Created(absence))
    }

    /// Create one row per item without checking for existing ones.
    pub async fn create_absences(&self, items: Vec<SetAbsence>) -> Result<Vec<Absence>> {
        for item in &items {
            item.validate()?;
        }

        let mut created = Vec::with_capacity(items.len());
        for item in &items {
            let key = item.natural_key();
            let _guard = self.absence_locks.lock(&key).await;
            created.push(self.create_absence_row(item, &key).await?);
        }

        info!(count = created.len(), "Absence batch created");
        Ok(created)
    }

    async fn create_absence_row(&self, req: &SetAbsence, key: &str) -> Result<Absence> {
        let body = to_row(json!({
            "Title": key,
            "PersNr": req.pers_nr,
            "Datum": day(req.date),
            "Typ": req.kind.code(),
        }))?;
        self.create(&ABSENCES, body).await
    }

    pub async fn delete_absence(&self, id: u64) -> Result<()> {
        self.delete(&ABSENCES, id).await
    }

    // =========================================================================
    // Cost centers
    // =========================================================================

    pub async fn cost_centers(&self) -> Result<Vec<CostCenter>> {
        self.read(
            &COST_CENTERS,
            COST_CENTERS.query().filter(Filter::eq("Aktiv", true)),
        )
        .await
    }

    pub async fn update_cost_center(&self, id: u64, patch: CostCenterPatch) -> Result<()> {
        self.merge(&COST_CENTERS, id, patch).await
    }

    // =========================================================================
    // Crews
    // =========================================================================

    /// All crews with their member rows attached.
    pub async fn crews(&self) -> Result<Vec<Crew>> {
        let mut crews: Vec<Crew> = self.read(&CREWS, CREWS.query()).await?;
        let members: Vec<CrewMember> = self.read(&CREW_MEMBERS, CREW_MEMBERS.query()).await?;

        let mut by_crew: HashMap<u64, Vec<CrewMember>> = HashMap::new();
        for member in members {
            by_crew.entry(member.crew_id).or_default().push(member);
        }

        for crew in &mut crews {
            crew.members = by_crew.remove(&crew.id).unwrap_or_default();
        }

        Ok(crews)
    }

    pub async fn create_crew(&self, req: NewCrew) -> Result<Crew> {
        req.validate()?;
        let body = to_row(json!({
            "Title": req.name,
            "Polier": req.foreman.unwrap_or_default(),
        }))?;

        let crew: Crew = self.create(&CREWS, body).await?;
        info!(id = crew.id, name = %crew.name, "Crew created");
        Ok(crew)
    }

    pub async fn update_crew(&self, id: u64, patch: CrewPatch) -> Result<()> {
        self.merge(&CREWS, id, patch).await
    }

    /// Delete the crew's member rows, then the crew.
    ///
    /// Not transactional: a failure midway leaves the rows deleted so far
    /// deleted and returns the error.
    pub async fn delete_crew(&self, id: u64) -> Result<()> {
        let removed = self.delete_members(Filter::eq("KolonneId", id)).await?;
        self.delete(&CREWS, id).await?;
        info!(id, members = removed, "Crew deleted");
        Ok(())
    }

    pub async fn add_member(&self, crew_id: u64, req: NewMember) -> Result<CrewMember> {
        req.validate()?;
        let body = to_row(json!({
            "Title": CrewMember::title_for(crew_id, &req.pers_nr),
            "KolonneId": crew_id,
            "PersNr": req.pers_nr,
        }))?;
        self.create(&CREW_MEMBERS, body).await
    }

    /// Remove every membership row of the person in the crew.
    pub async fn remove_member(&self, crew_id: u64, pers_nr: &str) -> Result<usize> {
        self.delete_members(Filter::eq("KolonneId", crew_id).and(Filter::eq("PersNr", pers_nr)))
            .await
    }

    async fn delete_members(&self, filter: Filter) -> Result<usize> {
        let rows = self
            .store
            .get_all(CREW_MEMBERS.title, &ListQuery::new("Id").filter(filter))
            .await?;

        for row in &rows {
            self.delete(&CREW_MEMBERS, row_id(row)?).await?;
        }
        Ok(rows.len())
    }

    // =========================================================================
    // Assignments
    // =========================================================================

    pub async fn assignments(&self) -> Result<Vec<Assignment>> {
        self.read(&ASSIGNMENTS, ASSIGNMENTS.query()).await
    }

    pub async fn create_assignment(&self, req: NewAssignment) -> Result<Assignment> {
        req.validate()?;
        let title = req
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| Assignment::default_title(req.crew_id, req.cost_center_id));

        let body = to_row(json!({
            "Title": title,
            "KolonneId": req.crew_id,
            "KostenstelleId": req.cost_center_id,
            "Von": day(req.from),
            "Bis": day(req.to),
        }))?;
        self.create(&ASSIGNMENTS, body).await
    }

    pub async fn update_assignment(&self, id: u64, patch: AssignmentPatch) -> Result<()> {
        patch.validate()?;
        self.merge(&ASSIGNMENTS, id, patch).await
    }

    pub async fn delete_assignment(&self, id: u64) -> Result<()> {
        self.delete(&ASSIGNMENTS, id).await
    }

    // =========================================================================
    // Timeline
    // =========================================================================

    /// Timeline items, optionally only those of one cost-center number.
    pub async fn timeline(&self, kst_nr: Option<&str>) -> Result<Vec<TimelineItem>> {
        let mut query = TIMELINE.query();
        if let Some(nr) = kst_nr.filter(|nr| !nr.is_empty()) {
            query = query.filter(Filter::eq("KostenstelleNr", nr));
        }
        self.read(&TIMELINE, query).await
    }

    pub async fn create_timeline_item(&self, req: NewTimelineItem) -> Result<TimelineItem> {
        req.validate()?;
        let body = to_row(json!({
            "Title": req.title,
            "KostenstelleNr": req.cost_center_nr,
            "StartDatum": day(req.start),
            "EndeDatum": day(req.end),
            "Fortschritt": req.progress.unwrap_or(0.0),
        }))?;
        self.create(&TIMELINE, body).await
    }

    pub async fn update_timeline_item(&self, id: u64, patch: TimelinePatch) -> Result<()> {
        patch.validate()?;
        self.merge(&TIMELINE, id, patch).await
    }

    pub async fn delete_timeline_item(&self, id: u64) -> Result<()> {
        self.delete(&TIMELINE, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use planer_core::AbsenceType;
    use planer_core::dates::parse_day;
    use std::sync::atomic::Ordering;

    fn planer() -> (Arc<MemoryStore>, Planer) {
        let store = Arc::new(MemoryStore::new());
        let planer = Planer::new(store.clone());
        (store, planer)
    }

    fn set(pers_nr: &str, date: &str, kind: AbsenceType) -> SetAbsence {
        SetAbsence {
            pers_nr: pers_nr.into(),
            date: parse_day(date).unwrap(),
            kind,
        }
    }

    #[tokio::test]
    async fn test_set_absence_twice_same_type_keeps_one_row() {
        let (store, planer) = planer();

        let first = planer.set_absence(set("1234", "2026-03-10", AbsenceType::Vacation)).await.unwrap();
        let AbsenceWrite::Created(created) = first else {
            panic!("expected create");
        };
        assert_eq!(created.title, "1234-2026-03-10");

        let second = planer.set_absence(set("1234", "2026-03-10", AbsenceType::Vacation)).await.unwrap();
        assert_eq!(second, AbsenceWrite::Updated(created.id));
        assert_eq!(store.rows("Abwesenheiten").len(), 1);
    }

    #[tokio::test]
    async fn test_set_absence_other_type_replaces_in_place() {
        let (store, planer) = planer();

        let AbsenceWrite::Created(created) =
            planer.set_absence(set("1234", "2026-03-10", AbsenceType::Vacation)).await.unwrap()
        else {
            panic!("expected create");
        };
        let updated = planer.set_absence(set("1234", "2026-03-10", AbsenceType::Sick)).await.unwrap();
        assert_eq!(updated, AbsenceWrite::Updated(created.id));

        let rows = store.rows("Abwesenheiten");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Typ"], "K");
        assert_eq!(rows[0]["Title"], "1234-2026-03-10");
    }

    #[tokio::test]
    async fn test_concurrent_upserts_create_one_row() {
        let (store, planer) = planer();
        let planer = Arc::new(planer);

        let mut handles = Vec::new();
        for kind in [AbsenceType::Vacation, AbsenceType::Sick, AbsenceType::School] {
            let planer = planer.clone();
            handles.push(tokio::spawn(async move {
                planer.set_absence(set("77", "2026-03-12", kind)).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.rows("Abwesenheiten").len(), 1);
        assert_eq!(store.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_absence_on_holiday_is_stored() {
        let (_store, planer) = planer();
        planer.set_absence(set("1234", "2026-01-01", AbsenceType::Vacation)).await.unwrap();

        let range = AbsenceQuery {
            von: Some(parse_day("2026-01-01").unwrap()),
            bis: Some(parse_day("2026-01-01").unwrap()),
        };
        let absences = planer.absences(&range).await.unwrap();
        assert_eq!(absences.len(), 1);
        assert_eq!(absences[0].kind, AbsenceType::Vacation);
    }

    #[tokio::test]
    async fn test_absence_range_and_normalization() {
        let (store, planer) = planer();
        store.seed("Abwesenheiten", json!({ "Title": "2-2026-03-31", "PersNr": "2", "Datum": "2026-03-31T00:00:00Z", "Typ": "U" }));
        store.seed("Abwesenheiten", json!({ "Title": "1-2026-03-02", "PersNr": "1", "Datum": "2026-03-02T00:00:00Z", "Typ": "K" }));
        store.seed("Abwesenheiten", json!({ "Title": "1-2026-04-01", "PersNr": "1", "Datum": "2026-04-01T00:00:00Z", "Typ": "U" }));
        store.seed("Abwesenheiten", json!({ "Title": "3-2026-03-05", "PersNr": "3", "Datum": "2026-03-05T00:00:00Z", "Typ": "??" }));

        let march = AbsenceQuery {
            von: Some(parse_day("2026-03-01").unwrap()),
            bis: Some(parse_day("2026-03-31").unwrap()),
        };
        let absences = planer.absences(&march).await.unwrap();
        let keys: Vec<String> = absences.iter().map(|a| a.key()).collect();
        // Unknown type codes are skipped, the rest ordered by PersNr, Datum
        assert_eq!(keys, vec!["1-2026-03-02", "2-2026-03-31"]);

        let open_end = AbsenceQuery {
            von: Some(parse_day("2026-03-15").unwrap()),
            bis: None,
        };
        assert_eq!(planer.absences(&open_end).await.unwrap().len(), 2);

        let backwards = AbsenceQuery {
            von: Some(parse_day("2026-04-01").unwrap()),
            bis: Some(parse_day("2026-03-01").unwrap()),
        };
        let err = planer.absences(&backwards).await.unwrap_err();
        assert!(err.downcast_ref::<PlanerError>().is_some());
    }

    #[tokio::test]
    async fn test_batch_creates_every_item() {
        let (store, planer) = planer();
        let created = planer
            .create_absences(vec![
                set("1", "2026-03-10", AbsenceType::Vacation),
                set("1", "2026-03-11", AbsenceType::Vacation),
                set("2", "2026-03-10", AbsenceType::CompanyShutdown),
            ])
            .await
            .unwrap();

        assert_eq!(created.len(), 3);
        assert_eq!(store.rows("Abwesenheiten").len(), 3);
        assert_eq!(created[2].kind, AbsenceType::CompanyShutdown);
    }

    #[tokio::test]
    async fn test_crews_attach_members() {
        let (store, planer) = planer();
        let b = store.seed("Kolonnen", json!({ "Title": "B-Kolonne", "Polier0": "Meier" }));
        let a = store.seed("Kolonnen", json!({ "Title": "A-Kolonne" }));
        planer.add_member(b, NewMember { pers_nr: "10".into() }).await.unwrap();
        planer.add_member(b, NewMember { pers_nr: "11".into() }).await.unwrap();

        let crews = planer.crews().await.unwrap();
        assert_eq!(crews.len(), 2);
        assert_eq!(crews[0].id, a);
        assert!(crews[0].members.is_empty());
        assert_eq!(crews[0].foreman, None);
        assert_eq!(crews[1].foreman.as_deref(), Some("Meier"));
        assert_eq!(crews[1].member_pers_nrs().collect::<Vec<_>>(), vec!["10", "11"]);

        let rows = store.rows("KolonneMitglieder");
        assert_eq!(rows[0]["Title"], format!("{b}-10"));
    }

    #[tokio::test]
    async fn test_delete_crew_cascades_to_members() {
        let (store, planer) = planer();
        let crew = planer
            .create_crew(NewCrew { name: "Kolonne 1".into(), foreman: Some("Meier".into()) })
            .await
            .unwrap();
        let other = planer
            .create_crew(NewCrew { name: "Kolonne 2".into(), foreman: None })
            .await
            .unwrap();
        for p in ["1", "2", "3"] {
            planer.add_member(crew.id, NewMember { pers_nr: p.into() }).await.unwrap();
        }
        planer.add_member(other.id, NewMember { pers_nr: "4".into() }).await.unwrap();

        planer.delete_crew(crew.id).await.unwrap();

        let members = store.rows("KolonneMitglieder");
        assert_eq!(members.len(), 1);
        assert!(members.iter().all(|m| m["KolonneId"] != json!(crew.id)));
        assert_eq!(store.rows("Kolonnen").len(), 1);
    }

    #[tokio::test]
    async fn test_remove_member_deletes_all_matches() {
        let (store, planer) = planer();
        for p in ["5", "5", "6"] {
            planer.add_member(1, NewMember { pers_nr: p.into() }).await.unwrap();
        }
        planer.add_member(2, NewMember { pers_nr: "5".into() }).await.unwrap();

        assert_eq!(planer.remove_member(1, "5").await.unwrap(), 2);
        assert_eq!(store.rows("KolonneMitglieder").len(), 2);
        assert_eq!(planer.remove_member(1, "99").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_employees_only_active_in_group_order() {
        let (store, planer) = planer();
        let store_rows = [
            json!({ "Title": "Zeller", "PersNr": "3", "Gruppe": "Kanalbau", "Aktiv": true }),
            json!({ "Title": "Abel", "PersNr": "1", "Gruppe": "Kanalbau", "Aktiv": true }),
            json!({ "Title": "Alt", "PersNr": "9", "Gruppe": "Buero", "Aktiv": false }),
            json!({ "Title": "Berg", "PersNr": "2", "Gruppe": "Bauleiter", "Aktiv": true }),
        ];
        for row in store_rows {
            store.seed("Mitarbeiter", row);
        }

        let names: Vec<String> = planer.employees().await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Berg", "Abel", "Zeller"]);
    }

    #[tokio::test]
    async fn test_create_employee_defaults() {
        let (store, planer) = planer();
        let employee = planer
            .create_employee(NewEmployee {
                name: "Becker".into(),
                pers_nr: "100".into(),
                group: "Kanalbau".into(),
                first_name: None,
                notes: None,
                leave_days: None,
            })
            .await
            .unwrap();

        assert!(employee.active);
        assert_eq!(employee.leave_days, 0);
        assert_eq!(store.rows("Mitarbeiter")[0]["Notizen"], "");
    }

    const DEPLOYED_EMPLOYEE_COLUMNS: &str = "Id,Title,PersNr,Gruppe,Notizen,Urlaubstage,Aktiv";

    fn new_employee(first_name: Option<&str>) -> NewEmployee {
        NewEmployee {
            name: "Becker".into(),
            pers_nr: "100".into(),
            group: "Kanalbau".into(),
            first_name: first_name.map(Into::into),
            notes: None,
            leave_days: None,
        }
    }

    #[tokio::test]
    async fn test_employees_without_first_name_column() {
        let (store, planer) = planer();
        store.define_columns("Mitarbeiter", DEPLOYED_EMPLOYEE_COLUMNS);

        let employee = planer.create_employee(new_employee(Some(" Jana "))).await.unwrap();
        assert_eq!(employee.name, "Jana Becker");
        assert_eq!(employee.first_name, None);

        let rows = store.rows("Mitarbeiter");
        assert_eq!(rows[0]["Title"], "Jana Becker");
        assert!(!rows[0].contains_key("Vorname"));

        let employees = planer.employees().await.unwrap();
        assert_eq!(employees.len(), 1);

        let patch = EmployeePatch { first_name: Some("Jan".into()), ..Default::default() };
        let err = planer.update_employee(employee.id, patch).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<PlanerError>(), Some(PlanerError::Validation(_))));

        let patch = EmployeePatch {
            name: Some("Becker".into()),
            first_name: Some("Jan".into()),
            ..Default::default()
        };
        planer.update_employee(employee.id, patch).await.unwrap();
        assert_eq!(store.rows("Mitarbeiter")[0]["Title"], "Jan Becker");
    }

    #[tokio::test]
    async fn test_employees_with_first_name_column() {
        let (store, planer) = planer();
        let planer = planer.with_first_name_column(true);
        store.define_columns("Mitarbeiter", "Id,Title,PersNr,Vorname,Gruppe,Notizen,Urlaubstage,Aktiv");

        let employee = planer.create_employee(new_employee(Some("Jana"))).await.unwrap();
        assert_eq!(employee.name, "Becker");
        assert_eq!(store.rows("Mitarbeiter")[0]["Vorname"], "Jana");

        let patch = EmployeePatch { first_name: Some("Jan".into()), ..Default::default() };
        planer.update_employee(employee.id, patch).await.unwrap();

        let employees = planer.employees().await.unwrap();
        assert_eq!(employees[0].first_name.as_deref(), Some("Jan"));
        assert_eq!(employees[0].name, "Becker");
    }

    #[tokio::test]
    async fn test_first_name_select_fails_on_deployed_list() {
        let (store, planer) = planer();
        let planer = planer.with_first_name_column(true);
        store.define_columns("Mitarbeiter", DEPLOYED_EMPLOYEE_COLUMNS);

        assert!(planer.employees().await.is_err());
    }

    #[tokio::test]
    async fn test_cost_center_alias_round_trip() {
        let (store, planer) = planer();
        let id = store.seed("Kostenstellen", json!({ "Title": "24.002 Nord", "Aktiv": true, "Bauleiter0": "Krause" }));
        store.seed("Kostenstellen", json!({ "Title": "23.001 Alt", "Aktiv": false }));

        let patch = CostCenterPatch { site_manager: Some("Lange".into()), ..Default::default() };
        planer.update_cost_center(id, patch).await.unwrap();

        let row = &store.rows("Kostenstellen")[0];
        assert_eq!(row["Bauleiter0"], "Lange");
        assert!(!row.contains_key("Bauleiter"));

        let centers = planer.cost_centers().await.unwrap();
        assert_eq!(centers.len(), 1);
        assert_eq!(centers[0].site_manager.as_deref(), Some("Lange"));
        assert_eq!(centers[0].number(), "24.002");
    }

    #[tokio::test]
    async fn test_timeline_filter_and_aliases() {
        let (store, planer) = planer();
        let item = planer
            .create_timeline_item(NewTimelineItem {
                title: "Rohbau".into(),
                cost_center_nr: Some("24'002".into()),
                start: parse_day("2026-04-01").unwrap(),
                end: parse_day("2026-05-15").unwrap(),
                progress: None,
            })
            .await
            .unwrap();
        store.seed("Gantt chart", json!({ "Title": "Other", "KostenstelleNr": "25.001" }));

        let row = &store.rows("Gantt chart")[0];
        assert_eq!(row["Startdatum"], "2026-04-01");
        assert_eq!(row["Enddatum"], "2026-05-15");
        assert_eq!(item.start, Some(parse_day("2026-04-01").unwrap()));
        assert_eq!(item.progress, Some(0.0));

        let filtered = planer.timeline(Some("24'002")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Rohbau");
        assert_eq!(planer.timeline(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_assignment_default_title_and_validation() {
        let (_store, planer) = planer();
        let created = planer
            .create_assignment(NewAssignment {
                title: None,
                crew_id: 4,
                cost_center_id: 9,
                from: parse_day("2026-03-02").unwrap(),
                to: parse_day("2026-03-20").unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(created.title, "4-9");

        let bad = AssignmentPatch {
            from: Some(parse_day("2026-03-20").unwrap()),
            to: Some(parse_day("2026-03-02").unwrap()),
            ..Default::default()
        };
        assert!(planer.update_assignment(created.id, bad).await.is_err());
    }

    #[tokio::test]
    async fn test_upstream_errors_pass_through() {
        let (_store, planer) = planer();
        let err = planer.delete_assignment(42).await.unwrap_err();
        assert!(err.to_string().starts_with("SP DELETE"), "{err}");
    }
}
