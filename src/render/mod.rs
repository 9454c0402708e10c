//! Dashboard rendering with an embedded tera template.
//!
//! The same HTML is served by `GET /` and written to disk by the
//! `render-static` command. `.html` templates are auto-escaped, so scraped
//! text can never inject markup.

use chrono::{Datelike, Local, Weekday};
use tera::{Context, Tera};

use crate::domain::WeatherSnapshot;
use crate::error::StoreError;

const TEMPLATE_NAME: &str = "dashboard.html";
const TEMPLATE: &str = include_str!("dashboard.html");

/// Shown when no snapshot has been saved yet.
pub const NOT_AVAILABLE: &str = "Weather data not available yet. Please wait for the scraper to run.";

/// Shown when the snapshot file exists but cannot be loaded.
pub const LOAD_FAILED: &str = "Could not load weather data.";

/// Template failure.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The template could not be compiled or rendered.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// What the dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// The latest snapshot.
    Snapshot(WeatherSnapshot),
    /// A message in place of the data.
    Error(String),
}

impl DashboardView {
    /// Maps the result of [`crate::persistence::SnapshotStore::load`] to a view.
    ///
    /// A load failure is logged here; the page only shows a generic message.
    #[must_use]
    pub fn from_load(result: Result<Option<WeatherSnapshot>, StoreError>) -> Self {
        match result {
            Ok(Some(snapshot)) => Self::Snapshot(snapshot),
            Ok(None) => Self::Error(NOT_AVAILABLE.to_string()),
            Err(e) => {
                tracing::error!(error = %e, "error reading data file");
                Self::Error(LOAD_FAILED.to_string())
            }
        }
    }
}

/// Renders the dashboard page.
#[derive(Clone)]
pub struct DashboardRenderer {
    tera: Tera,
}

impl std::fmt::Debug for DashboardRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardRenderer").finish_non_exhaustive()
    }
}

impl DashboardRenderer {
    /// Compiles the embedded template.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the template does not compile.
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Renders `view` to a complete HTML document.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if rendering fails.
    pub fn render(&self, view: &DashboardView) -> Result<String, RenderError> {
        let mut ctx = Context::new();
        match view {
            DashboardView::Snapshot(snapshot) => {
                ctx.insert("weather", snapshot);
                ctx.insert("error", &None::<String>);
                ctx.insert("display_date", &display_date(snapshot));
                ctx.insert(
                    "updated_display",
                    &snapshot.last_updated.map(|at| {
                        at.with_timezone(&Local)
                            .format("%d.%m.%Y %H:%M")
                            .to_string()
                    }),
                );
            }
            DashboardView::Error(message) => {
                ctx.insert("weather", &None::<WeatherSnapshot>);
                ctx.insert("error", message);
                ctx.insert("display_date", "");
                ctx.insert("updated_display", &None::<String>);
            }
        }
        Ok(self.tera.render(TEMPLATE_NAME, &ctx)?)
    }
}

/// `2025-11-24` → `Montag, 24.11.25`. Unparsable dates are shown as stored.
fn display_date(snapshot: &WeatherSnapshot) -> String {
    snapshot.report_date().map_or_else(
        || snapshot.date.clone(),
        |date| {
            format!(
                "{}, {}",
                german_weekday(date.weekday()),
                date.format("%d.%m.%y")
            )
        },
    )
}

const fn german_weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Montag",
        Weekday::Tue => "Dienstag",
        Weekday::Wed => "Mittwoch",
        Weekday::Thu => "Donnerstag",
        Weekday::Fri => "Freitag",
        Weekday::Sat => "Samstag",
        Weekday::Sun => "Sonntag",
    }
}
