//! Cached reads and invalidating writes on top of [`Client`].

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use planer_core::availability::AbsenceIndex;
use planer_core::date_range::DateRange;
use planer_core::holidays::HolidayCalendar;
use planer_core::protocol::{
    AssignmentPatch, CostCenterPatch, CrewPatch, EmployeePatch, HealthResponse, NewAssignment,
    NewCrew, NewEmployee, NewTimelineItem, SetAbsence, SetAbsenceResponse, TimelinePatch,
};
use planer_core::summary::Snapshot;
use planer_core::{Absence, Assignment, CostCenter, Crew, CrewMember, Employee, TimelineItem};

use crate::cache::{Entity, QueryCache, QueryKey, cached};
use crate::client::Client;

pub struct Planer {
    client: Client,
    cache: QueryCache,
}

/// Every collection loaded for one window of days.
pub struct Board {
    pub window: DateRange,
    pub employees: Vec<Employee>,
    pub absences: AbsenceIndex,
    pub crews: Vec<Crew>,
    pub assignments: Vec<Assignment>,
    pub cost_centers: Vec<CostCenter>,
    pub timeline: Vec<TimelineItem>,
}

impl Board {
    pub fn snapshot<'a>(&'a self, calendar: &'a HolidayCalendar) -> Snapshot<'a> {
        Snapshot {
            employees: &self.employees,
            absences: &self.absences,
            crews: &self.crews,
            assignments: &self.assignments,
            cost_centers: &self.cost_centers,
            timeline: &self.timeline,
            calendar,
        }
    }
}

impl Planer {
    pub fn new(client: Client, cache: QueryCache) -> Self {
        Planer { client, cache }
    }

    /// Persist the query cache.
    pub fn finish(mut self) -> Result<()> {
        self.cache.save()
    }

    fn written(&mut self, entity: Entity) {
        self.cache.invalidate(entity);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn health(&mut self) -> Result<HealthResponse> {
        let client = &self.client;
        cached(&mut self.cache, QueryKey::new(Entity::Health), Utc::now(), || client.health()).await
    }

    pub async fn employees(&mut self) -> Result<Vec<Employee>> {
        let client = &self.client;
        cached(&mut self.cache, QueryKey::new(Entity::Employees), Utc::now(), || client.employees()).await
    }

    pub async fn absences(&mut self, range: &DateRange) -> Result<Vec<Absence>> {
        let client = &self.client;
        let key = QueryKey::new(Entity::Absences)
            .param(range.from)
            .param(range.to);
        cached(&mut self.cache, key, Utc::now(), || client.absences(range)).await
    }

    pub async fn cost_centers(&mut self) -> Result<Vec<CostCenter>> {
        let client = &self.client;
        cached(&mut self.cache, QueryKey::new(Entity::CostCenters), Utc::now(), || client.cost_centers()).await
    }

    pub async fn crews(&mut self) -> Result<Vec<Crew>> {
        let client = &self.client;
        cached(&mut self.cache, QueryKey::new(Entity::Crews), Utc::now(), || client.crews()).await
    }

    pub async fn assignments(&mut self) -> Result<Vec<Assignment>> {
        let client = &self.client;
        cached(&mut self.cache, QueryKey::new(Entity::Assignments), Utc::now(), || client.assignments()).await
    }

    pub async fn timeline(&mut self, kst_nr: Option<&str>) -> Result<Vec<TimelineItem>> {
        let client = &self.client;
        let mut key = QueryKey::new(Entity::Timeline);
        if let Some(kst_nr) = kst_nr {
            key = key.param(kst_nr);
        }
        cached(&mut self.cache, key, Utc::now(), || client.timeline(kst_nr)).await
    }

    /// Load everything the aggregate views need for `window`.
    pub async fn board(&mut self, window: DateRange) -> Result<Board> {
        let employees = self.employees().await?;
        let absences = self.absences(&window).await?;
        let crews = self.crews().await?;
        let assignments = self.assignments().await?;
        let cost_centers = self.cost_centers().await?;
        let timeline = self.timeline(None).await?;

        Ok(Board {
            window,
            employees,
            absences: AbsenceIndex::new(&absences),
            crews,
            assignments,
            cost_centers,
            timeline,
        })
    }

    /// The absence of one person on one day, read through the cache.
    pub async fn absence_on(&mut self, pers_nr: &str, day: NaiveDate) -> Result<Option<Absence>> {
        let absences = self.absences(&DateRange::month_of(day)).await?;
        Ok(absences
            .into_iter()
            .find(|a| a.pers_nr == pers_nr && a.date == day))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub async fn create_employee(&mut self, req: &NewEmployee) -> Result<Employee> {
        let employee = self.client.create_employee(req).await?;
        self.written(Entity::Employees);
        Ok(employee)
    }

    pub async fn update_employee(&mut self, id: u64, patch: &EmployeePatch) -> Result<()> {
        self.client.update_employee(id, patch).await?;
        self.written(Entity::Employees);
        Ok(())
    }

    pub async fn set_absence(&mut self, req: &SetAbsence) -> Result<SetAbsenceResponse> {
        let resp = self.client.set_absence(req).await?;
        self.written(Entity::Absences);
        Ok(resp)
    }

    pub async fn import_absences(&mut self, items: &[SetAbsence]) -> Result<Vec<Absence>> {
        let created = self.client.import_absences(items).await?;
        self.written(Entity::Absences);
        Ok(created)
    }

    pub async fn delete_absence(&mut self, id: u64) -> Result<()> {
        self.client.delete_absence(id).await?;
        self.written(Entity::Absences);
        Ok(())
    }

    pub async fn update_cost_center(&mut self, id: u64, patch: &CostCenterPatch) -> Result<()> {
        self.client.update_cost_center(id, patch).await?;
        self.written(Entity::CostCenters);
        Ok(())
    }

    pub async fn create_crew(&mut self, req: &NewCrew) -> Result<Crew> {
        let crew = self.client.create_crew(req).await?;
        self.written(Entity::Crews);
        Ok(crew)
    }

    pub async fn update_crew(&mut self, id: u64, patch: &CrewPatch) -> Result<()> {
        self.client.update_crew(id, patch).await?;
        self.written(Entity::Crews);
        Ok(())
    }

    /// Members are removed server side before the crew.
    pub async fn delete_crew(&mut self, id: u64) -> Result<()> {
        let result = self.client.delete_crew(id).await;
        // A cascade that failed halfway still changed the members
        self.written(Entity::Crews);
        result
    }

    pub async fn add_member(&mut self, crew_id: u64, pers_nr: &str) -> Result<CrewMember> {
        let member = self.client.add_member(crew_id, pers_nr).await?;
        self.written(Entity::Crews);
        Ok(member)
    }

    pub async fn remove_member(&mut self, crew_id: u64, pers_nr: &str) -> Result<()> {
        self.client.remove_member(crew_id, pers_nr).await?;
        self.written(Entity::Crews);
        Ok(())
    }

    pub async fn create_assignment(&mut self, req: &NewAssignment) -> Result<Assignment> {
        let assignment = self.client.create_assignment(req).await?;
        self.written(Entity::Assignments);
        Ok(assignment)
    }

    pub async fn update_assignment(&mut self, id: u64, patch: &AssignmentPatch) -> Result<()> {
        self.client.update_assignment(id, patch).await?;
        self.written(Entity::Assignments);
        Ok(())
    }

    pub async fn delete_assignment(&mut self, id: u64) -> Result<()> {
        self.client.delete_assignment(id).await?;
        self.written(Entity::Assignments);
        Ok(())
    }

    pub async fn create_timeline_item(&mut self, req: &NewTimelineItem) -> Result<TimelineItem> {
        let item = self.client.create_timeline_item(req).await?;
        self.written(Entity::Timeline);
        Ok(item)
    }

    pub async fn update_timeline_item(&mut self, id: u64, patch: &TimelinePatch) -> Result<()> {
        self.client.update_timeline_item(id, patch).await?;
        self.written(Entity::Timeline);
        Ok(())
    }

    pub async fn delete_timeline_item(&mut self, id: u64) -> Result<()> {
        self.client.delete_timeline_item(id).await?;
        self.written(Entity::Timeline);
        Ok(())
    }
}
