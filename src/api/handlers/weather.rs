//! `GET /api/data`: the snapshot as JSON.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::WeatherSnapshot;
use crate::error::{ApiError, ErrorResponse};
use crate::render::NOT_AVAILABLE;

/// `GET /api/data` — Latest weather snapshot.
///
/// Before the first successful scrape this still answers 200, with an
/// `error` body instead of the snapshot.
///
/// # Errors
///
/// Returns [`ApiError::Store`] if the snapshot file cannot be loaded.
#[utoipa::path(
    get,
    path = "/api/data",
    tag = "Weather",
    summary = "Latest snapshot",
    description = "Returns the most recently scraped Tages-News fields.",
    responses(
        (status = 200, description = "Snapshot, or a not-available message", body = WeatherSnapshot),
        (status = 500, description = "Snapshot file unreadable", body = ErrorResponse),
    )
)]
pub async fn get_data(State(state): State<AppState>) -> Result<Response, ApiError> {
    let response = match state.store.load().await? {
        Some(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        None => (StatusCode::OK, Json(ErrorResponse::message(NOT_AVAILABLE))).into_response(),
    };
    Ok(response)
}

/// Weather data route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/data", get(get_data))
}
