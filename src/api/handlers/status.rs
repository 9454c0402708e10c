//! `GET /api/status`: scheduler bookkeeping.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::ScrapeStatus;

/// `GET /api/status` — Scrape counters and timestamps since startup.
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "Weather",
    summary = "Scraper status",
    description = "Success and failure counts, last attempt, last error and next scheduled run.",
    responses(
        (status = 200, description = "Scraper status", body = ScrapeStatus),
    )
)]
pub async fn get_status(State(state): State<AppState>) -> Json<ScrapeStatus> {
    Json(state.status.snapshot().await)
}

/// Status route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/status", get(get_status))
}
