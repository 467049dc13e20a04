//! Timeline (Gantt) endpoints

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use planer_core::TimelineItem;
use planer_core::protocol::{
    ListResponse, NewTimelineItem, SuccessResponse, TimelinePatch, TimelineQuery,
};

use crate::routes::{ApiJson, ApiPath, ApiQuery, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gantt", get(list_items).post(create_item))
        .route("/gantt/{id}", put(update_item).delete(delete_item))
}

/// GET /gantt?kstNr - Timeline items, optionally of one cost center number
async fn list_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TimelineQuery>,
) -> Result<Json<ListResponse<TimelineItem>>, AppError> {
    let items = state.planer.timeline(query.kst_nr.as_deref()).await?;
    Ok(Json(ListResponse::new(items)))
}

/// POST /gantt
async fn create_item(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewTimelineItem>,
) -> Result<(StatusCode, Json<TimelineItem>), AppError> {
    let item = state.planer.create_timeline_item(req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /gantt/:id
async fn update_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(patch): ApiJson<TimelinePatch>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.planer.update_timeline_item(id, patch).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /gantt/:id
async fn delete_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.planer.delete_timeline_item(id).await?;
    Ok(Json(SuccessResponse::ok()))
}
