//! Cost center endpoints

use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use planer_core::CostCenter;
use planer_core::protocol::{CostCenterPatch, ListResponse, SuccessResponse};

use crate::routes::{ApiJson, ApiPath, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kostenstellen", get(list_cost_centers))
        .route("/kostenstellen/{id}", put(update_cost_center))
}

/// GET /kostenstellen - Active cost centers
async fn list_cost_centers(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<CostCenter>>, AppError> {
    let cost_centers = state.planer.cost_centers().await?;
    Ok(Json(ListResponse::new(cost_centers)))
}

/// PUT /kostenstellen/:id
async fn update_cost_center(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(patch): ApiJson<CostCenterPatch>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.planer.update_cost_center(id, patch).await?;
    Ok(Json(SuccessResponse::ok()))
}
