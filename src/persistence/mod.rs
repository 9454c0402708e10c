//! Persistence layer: the latest weather snapshot as a JSON file.
//!
//! There is exactly one record. Every successful scrape overwrites it and
//! the HTTP handlers read it on each request, so a scraper running in a
//! separate process is picked up without coordination.

pub mod snapshot_store;

pub use snapshot_store::SnapshotStore;
