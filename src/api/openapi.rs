//! OpenAPI document for the HTTP API.

// utoipa derive output
#![allow(clippy::needless_for_each)]

use axum::Router;
use utoipa::OpenApi;

use crate::api::handlers;
use crate::app_state::AppState;

/// OpenAPI documentation for the dashboard service.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Skiwetter Altenberg API",
        description = "Latest ski weather scraped from the Altenberg Tages-News bulletin",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    tags(
        (name = "Dashboard", description = "HTML dashboard"),
        (name = "Weather", description = "Snapshot data and scraper status"),
        (name = "System", description = "Health check")
    ),
    paths(
        handlers::dashboard::dashboard,
        handlers::weather::get_data,
        handlers::status::get_status,
        handlers::system::health_handler,
    )
)]
pub struct ApiDoc;

/// Serves `/api-docs/openapi.json` and, with the `swagger-ui` feature,
/// Swagger UI at `/swagger-ui`.
#[cfg(feature = "swagger-ui")]
pub fn routes() -> Router<AppState> {
    Router::new().merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
}

/// Serves `/api-docs/openapi.json`.
#[cfg(not(feature = "swagger-ui"))]
pub fn routes() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
