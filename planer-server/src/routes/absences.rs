//! Absence endpoints

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get},
};
use planer_core::Absence;
use planer_core::protocol::{
    AbsenceQuery, AbsenceRequest, AbsenceUpdated, ListResponse, SetAbsenceResponse,
    SuccessResponse,
};

use crate::routes::{ApiJson, ApiPath, ApiQuery, AppError};
use crate::service::AbsenceWrite;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/abwesenheiten", get(list_absences).post(set_absences))
        .route("/abwesenheiten/{id}", delete(delete_absence))
}

/// GET /abwesenheiten?von&bis - Absences in a date range
async fn list_absences(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<AbsenceQuery>,
) -> Result<Json<ListResponse<Absence>>, AppError> {
    let absences = state.planer.absences(&range).await?;
    Ok(Json(ListResponse::new(absences)))
}

/// POST /abwesenheiten - Upsert one absence, or create a batch
async fn set_absences(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AbsenceRequest>,
) -> Result<(StatusCode, Json<SetAbsenceResponse>), AppError> {
    let (status, body) = match req {
        AbsenceRequest::Single(item) => match state.planer.set_absence(item).await? {
            AbsenceWrite::Updated(id) => (
                StatusCode::OK,
                SetAbsenceResponse::Updated(AbsenceUpdated { id, updated: true }),
            ),
            AbsenceWrite::Created(absence) => {
                (StatusCode::CREATED, SetAbsenceResponse::Created(absence))
            }
        },
        AbsenceRequest::Batch(items) => {
            let created = state.planer.create_absences(items).await?;
            (
                StatusCode::CREATED,
                SetAbsenceResponse::Batch(ListResponse::new(created)),
            )
        }
    };

    Ok((status, Json(body)))
}

/// DELETE /abwesenheiten/:id
async fn delete_absence(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.planer.delete_absence(id).await?;
    Ok(Json(SuccessResponse::ok()))
}
