//! Crew assignment endpoints

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use planer_core::Assignment;
use planer_core::protocol::{AssignmentPatch, ListResponse, NewAssignment, SuccessResponse};

use crate::routes::{ApiJson, ApiPath, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/zuweisungen", get(list_assignments).post(create_assignment))
        .route("/zuweisungen/{id}", put(update_assignment).delete(delete_assignment))
}

/// GET /zuweisungen - All assignments, ordered by start
async fn list_assignments(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Assignment>>, AppError> {
    let assignments = state.planer.assignments().await?;
    Ok(Json(ListResponse::new(assignments)))
}

/// POST /zuweisungen
async fn create_assignment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewAssignment>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    let assignment = state.planer.create_assignment(req).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// PUT /zuweisungen/:id
async fn update_assignment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(patch): ApiJson<AssignmentPatch>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.planer.update_assignment(id, patch).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /zuweisungen/:id
async fn delete_assignment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.planer.delete_assignment(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::*;

    #[tokio::test]
    async fn test_overlapping_assignments_are_allowed() {
        let (_store, app) = memory_app();

        for (from, to) in [("2026-03-02", "2026-03-20"), ("2026-03-16", "2026-04-03")] {
            let (status, created) = send(
                &app,
                "POST",
                "/api/zuweisungen",
                Some(json!({ "KolonneId": 1, "KostenstelleId": 7, "Von": from, "Bis": to })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(created["Title"], "1-7");
        }

        let (_, list) = send(&app, "GET", "/api/zuweisungen", None).await;
        let starts: Vec<&str> = list["value"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["Von"].as_str().unwrap())
            .collect();
        assert_eq!(starts, vec!["2026-03-02", "2026-03-16"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (store, app) = memory_app();
        let (_, created) = send(
            &app,
            "POST",
            "/api/zuweisungen",
            Some(json!({ "Title": "Nord", "KolonneId": 1, "KostenstelleId": 7, "Von": "2026-03-02", "Bis": "2026-03-20" })),
        )
        .await;
        assert_eq!(created["Title"], "Nord");
        let id = created["Id"].as_u64().unwrap();

        let (status, _) = send(&app, "PUT", &format!("/api/zuweisungen/{id}"), Some(json!({ "Bis": "2026-03-27" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(store.rows("Zuweisungen")[0]["Bis"], "2026-03-27");

        let (status, _) = send(&app, "DELETE", &format!("/api/zuweisungen/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(store.rows("Zuweisungen").is_empty());
    }

    #[tokio::test]
    async fn test_reversed_range_is_400() {
        let (_store, app) = memory_app();
        let (status, _) = send(
            &app,
            "POST",
            "/api/zuweisungen",
            Some(json!({ "KolonneId": 1, "KostenstelleId": 7, "Von": "2026-03-20", "Bis": "2026-03-02" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
