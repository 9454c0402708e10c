//! Command-line interface.
//!
//! `skiwetter` without a subcommand runs `serve`: the scrape scheduler plus
//! the web dashboard in one process. The other subcommands are one-shot
//! operations for cron jobs, CI checks and static publishing.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use axum::Router;
use axum::http::StatusCode;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api;
use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::domain::{StatusTracker, WeatherSnapshot};
use crate::error::ScrapeError;
use crate::persistence::SnapshotStore;
use crate::render::{DashboardRenderer, DashboardView};
use crate::schedule::ScheduleConfig;
use crate::scrape::{SkiWeatherScraper, extract_first_page_text, extract_weather_data};
use crate::service::ScrapeService;
use crate::tasks::spawn_scrape_task;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skiwetter", version, about = "Altenberg ski weather scraper and dashboard")]
pub struct Cli {
    /// What to do; defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the scrape scheduler and the web server.
    Serve,

    /// Scrape once and print the saved snapshot.
    Scrape,

    /// Fail unless the stored snapshot is from today.
    Verify,

    /// Write the dashboard as a static HTML file.
    RenderStatic {
        /// Output file.
        #[arg(long, default_value = "docs/index.html")]
        output: PathBuf,
    },

    /// Print the page-1 text of a local PDF and the fields parsed from it.
    DumpPdf {
        /// PDF file to analyze.
        file: PathBuf,
    },
}

/// Why a stored snapshot does not pass `verify`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerifyError {
    /// Nothing has been saved yet.
    #[error("data file not found")]
    NoData,

    /// The `date` field is not `YYYY-MM-DD`.
    #[error("could not parse date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The bulletin is from another day.
    #[error("scraped data is not from today: expected {expected}, found {found}")]
    Stale {
        /// Today's date.
        expected: NaiveDate,
        /// Date in the snapshot.
        found: NaiveDate,
    },
}

/// Checks that `snapshot` exists and carries `today`'s bulletin date.
///
/// # Errors
///
/// Returns [`VerifyError`] describing the first check that failed.
pub fn verify_snapshot(
    snapshot: Option<&WeatherSnapshot>,
    today: NaiveDate,
) -> Result<NaiveDate, VerifyError> {
    let snapshot = snapshot.ok_or(VerifyError::NoData)?;
    let found = snapshot
        .report_date()
        .ok_or_else(|| VerifyError::InvalidDate(snapshot.date.clone()))?;
    if found == today {
        Ok(found)
    } else {
        Err(VerifyError::Stale {
            expected: today,
            found,
        })
    }
}

impl Cli {
    /// Runs the selected subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error for failures that are not a plain "check failed"
    /// outcome, such as an unreadable schedule file or a port already in use.
    pub async fn run(self, config: AppConfig) -> anyhow::Result<ExitCode> {
        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => serve(&config).await,
            Command::Scrape => scrape(&config).await,
            Command::Verify => verify(&config).await,
            Command::RenderStatic { output } => {
                render_static(&SnapshotStore::new(config.data_file.clone()), &output).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::DumpPdf { file } => dump_pdf(&file).await,
        }
    }
}

fn build_service(config: &AppConfig) -> Result<ScrapeService, ScrapeError> {
    let scraper = SkiWeatherScraper::new(config.scraper_config())?;
    Ok(ScrapeService::new(
        Arc::new(scraper),
        SnapshotStore::new(config.data_file.clone()),
        Arc::new(StatusTracker::new()),
    )
    .with_mirror_dir(config.mirror_dir.clone()))
}

async fn serve(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let schedule = ScheduleConfig::load(&config.schedule_file)?;
    let service = Arc::new(build_service(config)?);

    let app_state = AppState {
        store: service.store().clone(),
        status: Arc::clone(service.status()),
        renderer: Arc::new(DashboardRenderer::new()?),
    };

    let scheduler = spawn_scrape_task(Arc::clone(&service), schedule);

    let app = Router::new()
        .merge(api::build_router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("could not bind {}", config.listen_addr))?;
    info!(
        addr = %config.listen_addr,
        data_file = %config.data_file.display(),
        "server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.abort();
    info!("server shutdown complete");
    Ok(ExitCode::SUCCESS)
}

async fn scrape(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let service = build_service(config)?;
    // run_once logs and records its own failure
    let Ok(snapshot) = service.run_once().await else {
        return Ok(ExitCode::FAILURE);
    };
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(ExitCode::SUCCESS)
}

async fn verify(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let store = SnapshotStore::new(config.data_file.clone());
    let snapshot = store.load().await?;
    let today = Local::now().date_naive();

    match verify_snapshot(snapshot.as_ref(), today) {
        Ok(date) => {
            println!("Data verification successful. Data date ({date}) matches today's date ({today}).");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {e} ({})", store.path().display());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Renders the dashboard for the stored snapshot into `output`.
async fn render_static(store: &SnapshotStore, output: &Path) -> anyhow::Result<()> {
    let view = DashboardView::from_load(store.load().await);
    let html = DashboardRenderer::new()?.render(&view)?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, html)
        .await
        .with_context(|| format!("could not write {}", output.display()))?;

    info!(output = %output.display(), "static page generated");
    Ok(())
}

async fn dump_pdf(file: &Path) -> anyhow::Result<ExitCode> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("could not read {}", file.display()))?;
    let text = extract_first_page_text(&bytes)?;
    let fields = extract_weather_data(&text);

    println!("--- TEXT ---");
    println!("{text}");
    println!("--- FIELDS ---");
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(ExitCode::SUCCESS)
}

/// Wait for shutdown signals (SIGINT, SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
