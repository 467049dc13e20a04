//! Employee endpoints

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use planer_core::Employee;
use planer_core::protocol::{EmployeePatch, ListResponse, NewEmployee, SuccessResponse};

use crate::routes::{ApiJson, ApiPath, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mitarbeiter", get(list_employees).post(create_employee))
        .route("/mitarbeiter/{id}", put(update_employee))
}

/// GET /mitarbeiter - Active employees
async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Employee>>, AppError> {
    let employees = state.planer.employees().await?;
    Ok(Json(ListResponse::new(employees)))
}

/// POST /mitarbeiter - Create an employee
async fn create_employee(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewEmployee>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let employee = state.planer.create_employee(req).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /mitarbeiter/:id - Merge the given fields
async fn update_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(patch): ApiJson<EmployeePatch>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.planer.update_employee(id, patch).await?;
    Ok(Json(SuccessResponse::ok()))
}
