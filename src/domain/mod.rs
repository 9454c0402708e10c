//! Domain layer: the weather snapshot and scrape bookkeeping.
//!
//! This module holds the one persistent record the service produces and the
//! shared status the scheduler reports through the HTTP API.

pub mod scrape_status;
pub mod snapshot;

pub use scrape_status::{ScrapeStatus, StatusTracker};
pub use snapshot::{UNKNOWN, WeatherSnapshot};
