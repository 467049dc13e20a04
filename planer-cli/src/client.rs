//! HTTP client for planer-server

use std::time::Duration;

use anyhow::{Context, Result};
use planer_core::date_range::DateRange;
use planer_core::protocol::{
    AssignmentPatch, CostCenterPatch, CrewPatch, EmployeePatch, ErrorResponse, HealthResponse,
    ListResponse, NewAssignment, NewCrew, NewEmployee, NewMember, NewTimelineItem,
    SetAbsence, SetAbsenceResponse, SuccessResponse, TimelinePatch,
};
use planer_core::{Absence, Assignment, CostCenter, Crew, CrewMember, Employee, TimelineItem};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

const TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for planer-server
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
}

impl Client {
    pub fn new(server: &str) -> Result<Self> {
        let base_url = Url::parse(server).with_context(|| format!("Invalid server URL: {}", server))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid server URL: {}", server);
        }

        let http = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(concat!("planer/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Client { http, base_url })
    }

    /// `{server}/api/{segments...}`, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!(method = method.as_str(), url = url.as_str(), "Request");
        self.http.request(method, url)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let resp = builder.send().await.context("Failed to connect to server")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(error_from(status, &body));
        }

        Ok(resp.json().await.context("Unexpected response from server")?)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        self.send(self.request(Method::GET, segments)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, segments: &[&str], body: &B) -> Result<T> {
        self.send(self.request(Method::POST, segments).json(body)).await
    }

    async fn put<B: Serialize>(&self, segments: &[&str], body: &B) -> Result<()> {
        let _: SuccessResponse = self.send(self.request(Method::PUT, segments).json(body)).await?;
        Ok(())
    }

    async fn delete(&self, segments: &[&str]) -> Result<()> {
        let _: SuccessResponse = self.send(self.request(Method::DELETE, segments)).await?;
        Ok(())
    }

    /// GET /health
    ///
    /// A failed check answers 500 with the same body shape, so it is decoded
    /// either way.
    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self
            .request(Method::GET, &["health"])
            .send()
            .await
            .context("Failed to connect to server")?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<HealthResponse>(&body) {
            Ok(health) => Ok(health),
            Err(_) => Err(error_from(status, &body)),
        }
    }

    // =========================================================================
    // Employees
    // =========================================================================

    /// GET /mitarbeiter
    pub async fn employees(&self) -> Result<Vec<Employee>> {
        let list: ListResponse<Employee> = self.get(&["mitarbeiter"]).await?;
        Ok(list.value)
    }

    /// POST /mitarbeiter
    pub async fn create_employee(&self, req: &NewEmployee) -> Result<Employee> {
        self.post(&["mitarbeiter"], req).await
    }

    /// PUT /mitarbeiter/:id
    pub async fn update_employee(&self, id: u64, patch: &EmployeePatch) -> Result<()> {
        self.put(&["mitarbeiter", &id.to_string()], patch).await
    }

    // =========================================================================
    // Absences
    // =========================================================================

    /// GET /abwesenheiten?von&bis
    pub async fn absences(&self, range: &DateRange) -> Result<Vec<Absence>> {
        let builder = self.request(Method::GET, &["abwesenheiten"]).query(&[
            ("von", range.from.to_string()),
            ("bis", range.to.to_string()),
        ]);
        let list: ListResponse<Absence> = self.send(builder).await?;
        Ok(list.value)
    }

    /// POST /abwesenheiten with a single object: upsert on (PersNr, Datum)
    pub async fn set_absence(&self, req: &SetAbsence) -> Result<SetAbsenceResponse> {
        self.post(&["abwesenheiten"], req).await
    }

    /// POST /abwesenheiten with an array: create every entry
    pub async fn import_absences(&self, items: &[SetAbsence]) -> Result<Vec<Absence>> {
        let resp: SetAbsenceResponse = self.post(&["abwesenheiten"], &items).await?;
        match resp {
            SetAbsenceResponse::Batch(list) => Ok(list.value),
            _ => anyhow::bail!("Unexpected response from server"),
        }
    }

    /// DELETE /abwesenheiten/:id
    pub async fn delete_absence(&self, id: u64) -> Result<()> {
        self.delete(&["abwesenheiten", &id.to_string()]).await
    }

    // =========================================================================
    // Cost centers
    // =========================================================================

    /// GET /kostenstellen
    pub async fn cost_centers(&self) -> Result<Vec<CostCenter>> {
        let list: ListResponse<CostCenter> = self.get(&["kostenstellen"]).await?;
        Ok(list.value)
    }

    /// PUT /kostenstellen/:id
    pub async fn update_cost_center(&self, id: u64, patch: &CostCenterPatch) -> Result<()> {
        self.put(&["kostenstellen", &id.to_string()], patch).await
    }

    // =========================================================================
    // Crews
    // =========================================================================

    /// GET /kolonnen
    pub async fn crews(&self) -> Result<Vec<Crew>> {
        let list: ListResponse<Crew> = self.get(&["kolonnen"]).await?;
        Ok(list.value)
    }

    /// POST /kolonnen
    pub async fn create_crew(&self, req: &NewCrew) -> Result<Crew> {
        self.post(&["kolonnen"], req).await
    }

    /// PUT /kolonnen/:id
    pub async fn update_crew(&self, id: u64, patch: &CrewPatch) -> Result<()> {
        self.put(&["kolonnen", &id.to_string()], patch).await
    }

    /// DELETE /kolonnen/:id
    pub async fn delete_crew(&self, id: u64) -> Result<()> {
        self.delete(&["kolonnen", &id.to_string()]).await
    }

    /// POST /kolonnen/:id/mitglieder
    pub async fn add_member(&self, crew_id: u64, pers_nr: &str) -> Result<CrewMember> {
        let req = NewMember {
            pers_nr: pers_nr.to_string(),
        };
        self.post(&["kolonnen", &crew_id.to_string(), "mitglieder"], &req)
            .await
    }

    /// DELETE /kolonnen/:id/mitglieder/:persNr
    pub async fn remove_member(&self, crew_id: u64, pers_nr: &str) -> Result<()> {
        self.delete(&["kolonnen", &crew_id.to_string(), "mitglieder", pers_nr])
            .await
    }

    // =========================================================================
    // Assignments
    // =========================================================================

    /// GET /zuweisungen
    pub async fn assignments(&self) -> Result<Vec<Assignment>> {
        let list: ListResponse<Assignment> = self.get(&["zuweisungen"]).await?;
        Ok(list.value)
    }

    /// POST /zuweisungen
    pub async fn create_assignment(&self, req: &NewAssignment) -> Result<Assignment> {
        self.post(&["zuweisungen"], req).await
    }

    /// PUT /zuweisungen/:id
    pub async fn update_assignment(&self, id: u64, patch: &AssignmentPatch) -> Result<()> {
        self.put(&["zuweisungen", &id.to_string()], patch).await
    }

    /// DELETE /zuweisungen/:id
    pub async fn delete_assignment(&self, id: u64) -> Result<()> {
        self.delete(&["zuweisungen", &id.to_string()]).await
    }

    // =========================================================================
    // Timeline
    // =========================================================================

    /// GET /gantt?kstNr
    pub async fn timeline(&self, kst_nr: Option<&str>) -> Result<Vec<TimelineItem>> {
        let mut builder = self.request(Method::GET, &["gantt"]);
        if let Some(kst_nr) = kst_nr {
            builder = builder.query(&[("kstNr", kst_nr)]);
        }
        let list: ListResponse<TimelineItem> = self.send(builder).await?;
        Ok(list.value)
    }

    /// POST /gantt
    pub async fn create_timeline_item(&self, req: &NewTimelineItem) -> Result<TimelineItem> {
        self.post(&["gantt"], req).await
    }

    /// PUT /gantt/:id
    pub async fn update_timeline_item(&self, id: u64, patch: &TimelinePatch) -> Result<()> {
        self.put(&["gantt", &id.to_string()], patch).await
    }

    /// DELETE /gantt/:id
    pub async fn delete_timeline_item(&self, id: u64) -> Result<()> {
        self.delete(&["gantt", &id.to_string()]).await
    }
}

/// Turn a failed response into an error, preferring the server's `{ error }`.
fn error_from(status: StatusCode, body: &str) -> anyhow::Error {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => anyhow::anyhow!("{}", err.error),
        Err(_) if body.trim().is_empty() => anyhow::anyhow!("Server answered {}", status),
        Err(_) => anyhow::anyhow!("Server answered {}: {}", status, body.trim()),
    }
}
