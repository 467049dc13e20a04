pub mod absences;
pub mod assignments;
pub mod cost_centers;
pub mod crews;
pub mod employees;
pub mod health;
pub mod timeline;

use std::time::Duration;

use axum::{
    Json, Router,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use planer_core::PlanerError;
use planer_core::protocol::ErrorResponse;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::state::AppState;

/// Convert errors to `{ "error": "..." }` responses.
///
/// Bad input maps to 400, missing rows to 404 and everything else,
/// upstream failures included, to 500.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn new(status: StatusCode, error: anyhow::Error) -> Self {
        AppError { status, error }
    }
}

fn status_for(error: &anyhow::Error) -> StatusCode {
    if let Some(e) = error.downcast_ref::<PlanerError>() {
        return match e {
            PlanerError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
    }

    if error.is::<JsonRejection>() || error.is::<PathRejection>() || error.is::<QueryRejection>() {
        return StatusCode::BAD_REQUEST;
    }

    StatusCode::INTERNAL_SERVER_ERROR
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(error = %self.error, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.error.to_string(),
        });
        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let error = err.into();
        AppError {
            status: status_for(&error),
            error,
        }
    }
}

/// `Json` whose rejection is an [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Path` whose rejection is an [`AppError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection is an [`AppError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

async fn not_found() -> AppError {
    AppError::new(StatusCode::NOT_FOUND, anyhow::anyhow!("Not Found"))
}

/// All endpoints under `/api`, with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    let api = Router::new()
        .merge(health::router())
        .merge(employees::router())
        .merge(absences::router())
        .merge(cost_centers::router())
        .merge(crews::router())
        .merge(assignments::router())
        .merge(timeline::router())
        .method_not_allowed_fallback(not_found);

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::store::memory::BrokenStore;

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (_store, app) = memory_app();
        let (status, body) = send(&app, "GET", "/api/nothing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not Found" }));

        let (status, _) = send(&app, "GET", "/elsewhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method_is_404() {
        let (_store, app) = memory_app();
        let (status, body) = send(&app, "PATCH", "/api/mitarbeiter", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not Found" }));
    }

    #[tokio::test]
    async fn test_malformed_input_is_400() {
        let (_store, app) = memory_app();

        let (status, body) = send(&app, "PUT", "/api/mitarbeiter/abc", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = send(&app, "POST", "/api/abwesenheiten", Some(json!({ "PersNr": "1" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/api/abwesenheiten",
            Some(json!({ "PersNr": "1", "Datum": "2026-03-10", "Typ": "X" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/api/abwesenheiten?von=gestern", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_failure_is_500_with_message() {
        let app = app_with(Arc::new(BrokenStore));
        let (status, body) = send(&app, "GET", "/api/kolonnen", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "ACS Token failed: 401" }));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let (_store, app) = memory_app();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/mitarbeiter")
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "PUT")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-max-age"], "86400");
        let methods = headers["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("DELETE"), "{methods}");
    }
}
