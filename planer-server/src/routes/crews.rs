//! Crew and crew member endpoints

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use planer_core::protocol::{CrewPatch, ListResponse, NewCrew, NewMember, SuccessResponse};
use planer_core::{Crew, CrewMember};

use crate::routes::{ApiJson, ApiPath, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kolonnen", get(list_crews).post(create_crew))
        .route("/kolonnen/{id}", put(update_crew).delete(delete_crew))
        .route("/kolonnen/{id}/mitglieder", post(add_member))
        .route("/kolonnen/{id}/mitglieder/{pers_nr}", delete(remove_member))
}

/// GET /kolonnen - Crews with their members
async fn list_crews(State(state): State<AppState>) -> Result<Json<ListResponse<Crew>>, AppError> {
    let crews = state.planer.crews().await?;
    Ok(Json(ListResponse::new(crews)))
}

/// POST /kolonnen
async fn create_crew(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewCrew>,
) -> Result<(StatusCode, Json<Crew>), AppError> {
    let crew = state.planer.create_crew(req).await?;
    Ok((StatusCode::CREATED, Json(crew)))
}

/// PUT /kolonnen/:id
async fn update_crew(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(patch): ApiJson<CrewPatch>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.planer.update_crew(id, patch).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /kolonnen/:id - Members first, then the crew
async fn delete_crew(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.planer.delete_crew(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /kolonnen/:id/mitglieder
async fn add_member(
    State(state): State<AppState>,
    ApiPath(crew_id): ApiPath<u64>,
    ApiJson(req): ApiJson<NewMember>,
) -> Result<(StatusCode, Json<CrewMember>), AppError> {
    let member = state.planer.add_member(crew_id, req).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// DELETE /kolonnen/:id/mitglieder/:persNr
async fn remove_member(
    State(state): State<AppState>,
    ApiPath((crew_id, pers_nr)): ApiPath<(u64, String)>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.planer.remove_member(crew_id, &pers_nr).await?;
    Ok(Json(SuccessResponse::ok()))
}
