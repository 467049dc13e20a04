//! Connectivity check against the list store

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use planer_core::protocol::HealthResponse;
use tracing::warn;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health - Token exchange and list titles
async fn health(State(state): State<AppState>) -> Response {
    match state.planer.list_titles().await {
        Ok(lists) => Json(HealthResponse {
            status: "ok".into(),
            token_ok: true,
            lists_available: lists,
            error: None,
        })
        .into_response(),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            let body = HealthResponse {
                status: "error".into(),
                token_ok: false,
                lists_available: Vec::new(),
                error: Some(e.to_string()),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
