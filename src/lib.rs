//! # skiwetter
//!
//! Scrapes the daily Tages-News PDF of the Altenberg ski resort, extracts the
//! ski weather fields and serves them on a small web dashboard and JSON API.
//!
//! ## Architecture
//!
//! ```text
//! Browser / curl
//!     │
//!     ├── Handlers (api/)            GET /, /api/data, /api/status, /health
//!     ├── DashboardRenderer (render/)
//!     │
//!     ├── SnapshotStore (persistence/) ── weather.json
//!     │        ▲
//!     ├── ScrapeService (service/)    ── StatusTracker (domain/)
//!     │        ▲
//!     ├── Scheduler task (tasks/)     ── schedule.yaml (schedule)
//!     │
//!     └── SkiWeatherScraper (scrape/)
//!              page HTML → PDF link → PDF bytes → page-1 text → fields
//! ```

pub mod api;
pub mod app_state;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod render;
pub mod schedule;
pub mod scrape;
pub mod service;
pub mod tasks;
