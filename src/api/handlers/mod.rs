//! Endpoint handlers organized by resource.

pub mod dashboard;
pub mod status;
pub mod system;
pub mod weather;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(dashboard::routes())
        .merge(weather::routes())
        .merge(status::routes())
        .merge(system::routes())
}
