//! HTTP layer: route handlers, OpenAPI document and router composition.
//!
//! | Route            | Handler                              |
//! |------------------|--------------------------------------|
//! | `GET /`          | [`handlers::dashboard::dashboard`]   |
//! | `GET /api/data`  | [`handlers::weather::get_data`]      |
//! | `GET /api/status`| [`handlers::status::get_status`]     |
//! | `GET /health`    | [`handlers::system::health_handler`] |

pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete router with all endpoints and the API docs.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .merge(openapi::routes())
}
