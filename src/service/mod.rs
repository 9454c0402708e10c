//! Service layer: scrape orchestration.
//!
//! [`ScrapeService`] ties the [`crate::scrape::WeatherSource`] to the
//! [`crate::persistence::SnapshotStore`] and records every outcome in the
//! shared [`crate::domain::StatusTracker`].

pub mod scrape_service;

pub use scrape_service::ScrapeService;
