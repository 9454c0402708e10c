//! `GET /`: the HTML dashboard.

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::render::DashboardView;

/// `GET /` — Dashboard with the latest snapshot.
///
/// Always 200 unless the template itself fails; missing or unreadable data
/// is reported inside the page.
///
/// # Errors
///
/// Returns [`ApiError::Render`] if the template fails to render.
#[utoipa::path(
    get,
    path = "/",
    tag = "Dashboard",
    summary = "HTML dashboard",
    description = "Renders the latest ski weather snapshot as an HTML page.",
    responses(
        (status = 200, description = "Dashboard page", content_type = "text/html", body = String),
    )
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let view = DashboardView::from_load(state.store.load().await);
    Ok(Html(state.renderer.render(&view)?))
}

/// Dashboard route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}
