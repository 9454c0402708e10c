//! Error types for the scrape pipeline, the snapshot store and the HTTP API.
//!
//! [`ScrapeError`] covers one scrape attempt end to end. The scheduler only
//! distinguishes "succeeded" from "failed"; the variants exist for logging.
//! [`ApiError`] maps to an HTTP status code and a JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::render::RenderError;

/// Failure while reading or writing the snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("snapshot i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but does not hold a valid snapshot.
    #[error("snapshot json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a single scrape attempt.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Network failure or non-success HTTP status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Tages-News page carried no dated bulletin link.
    #[error("no dated Tages-News link found on {0}")]
    LinkNotFound(String),

    /// The downloaded bytes could not be read as a PDF.
    #[error("pdf error: {0}")]
    Pdf(String),

    /// The PDF parsed but contains no pages.
    #[error("pdf has no pages")]
    EmptyPdf,

    /// The snapshot could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<lopdf::Error> for ScrapeError {
    fn from(err: lopdf::Error) -> Self {
        Self::Pdf(err.to_string())
    }
}

/// JSON error body returned by the API.
///
/// ```json
/// { "error": "Weather data not available yet. Please wait for the scraper to run." }
/// ```
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Numeric error code, omitted for informational bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
}

impl ErrorResponse {
    /// Builds a body that carries only a message.
    #[must_use]
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
        }
    }
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Code | Meaning                         | HTTP Status |
/// |------|---------------------------------|-------------|
/// | 3001 | snapshot file unreadable        | 500         |
/// | 3002 | dashboard template failed       | 500         |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The snapshot file exists but could not be loaded.
    #[error("could not load weather data: {0}")]
    Store(#[from] StoreError),

    /// The dashboard template failed to render.
    #[error("could not render dashboard: {0}")]
    Render(#[from] RenderError),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Store(_) => 3001,
            Self::Render(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Store(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: Some(self.error_code()),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
