//! Scrape service: one attempt = fetch, save, mirror, record outcome.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::{StatusTracker, WeatherSnapshot};
use crate::error::ScrapeError;
use crate::persistence::SnapshotStore;
use crate::scrape::WeatherSource;

/// Orchestrates scrape attempts.
///
/// Every attempt follows the pattern: fetch from the [`WeatherSource`] →
/// overwrite the [`SnapshotStore`] → optionally mirror the file → record
/// the outcome in the [`StatusTracker`]. A failed attempt never touches the
/// stored snapshot, so the previous one keeps being served.
#[derive(Debug, Clone)]
pub struct ScrapeService {
    source: Arc<dyn WeatherSource>,
    store: SnapshotStore,
    status: Arc<StatusTracker>,
    mirror_dir: Option<PathBuf>,
}

impl ScrapeService {
    /// Creates a new `ScrapeService`.
    #[must_use]
    pub fn new(
        source: Arc<dyn WeatherSource>,
        store: SnapshotStore,
        status: Arc<StatusTracker>,
    ) -> Self {
        Self {
            source,
            store,
            status,
            mirror_dir: None,
        }
    }

    /// Also copies each saved snapshot into `dir` (a static-site folder).
    #[must_use]
    pub fn with_mirror_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.mirror_dir = dir;
        self
    }

    /// Returns the shared status tracker.
    #[must_use]
    pub fn status(&self) -> &Arc<StatusTracker> {
        &self.status
    }

    /// Returns the snapshot store.
    #[must_use]
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Runs one scrape attempt and records its outcome.
    ///
    /// # Errors
    ///
    /// Returns the [`ScrapeError`] of the failed stage. The error has
    /// already been logged and recorded when this returns.
    pub async fn run_once(&self) -> Result<WeatherSnapshot, ScrapeError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("scrape", %run_id);

        async move {
            let started_at = Utc::now();
            tracing::info!("starting scraper job");

            match self.attempt().await {
                Ok(snapshot) => {
                    self.status.record_success(started_at).await;
                    tracing::info!(date = %snapshot.date, "scraper job finished");
                    Ok(snapshot)
                }
                Err(e) => {
                    self.status.record_failure(started_at, &e.to_string()).await;
                    tracing::error!(error = %e, "scraper job failed, keeping previous snapshot");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn attempt(&self) -> Result<WeatherSnapshot, ScrapeError> {
        let snapshot = self.source.fetch_snapshot().await?;

        let missing = snapshot.missing_fields();
        if !missing.is_empty() {
            tracing::warn!(?missing, "bulletin parsed with missing fields");
        }

        let saved = self.store.save(snapshot).await?;

        if let Some(dir) = &self.mirror_dir
            && let Err(e) = self.store.mirror_to(dir).await
        {
            tracing::warn!(error = %e, dir = %dir.display(), "could not mirror snapshot");
        }

        Ok(saved)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Source that returns a canned snapshot, or fails, and counts calls.
    #[derive(Debug)]
    pub(crate) struct MockSource {
        pub(crate) calls: AtomicUsize,
        fail: bool,
    }

    impl MockSource {
        pub(crate) fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherSource for MockSource {
        async fn fetch_snapshot(&self) -> Result<WeatherSnapshot, ScrapeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ScrapeError::EmptyPdf);
            }
            Ok(WeatherSnapshot {
                date: "2025-11-22".to_string(),
                temperature: format!("-{n}°C"),
                ..WeatherSnapshot::default()
            })
        }
    }

    fn temp_dir() -> tempfile::TempDir {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        dir
    }

    fn service(source: Arc<MockSource>, dir: &tempfile::TempDir) -> ScrapeService {
        ScrapeService::new(
            source,
            SnapshotStore::new(dir.path().join("weather.json")),
            Arc::new(StatusTracker::new()),
        )
    }

    #[tokio::test]
    async fn success_saves_and_records() {
        let dir = temp_dir();
        let service = service(Arc::new(MockSource::ok()), &dir);

        let Ok(saved) = service.run_once().await else {
            panic!("scrape failed");
        };
        assert!(saved.last_updated.is_some());

        let Ok(Some(stored)) = service.store().load().await else {
            panic!("nothing stored");
        };
        assert_eq!(stored, saved);

        let status = service.status().snapshot().await;
        assert_eq!(status.success_count, 1);
        assert_eq!(status.failure_count, 0);
    }

    #[tokio::test]
    async fn failure_keeps_previous_snapshot() {
        let dir = temp_dir();
        let good = service(Arc::new(MockSource::ok()), &dir);
        let Ok(first) = good.run_once().await else {
            panic!("first scrape failed");
        };

        let bad = service(Arc::new(MockSource::failing()), &dir);
        let result = bad.run_once().await;
        assert!(matches!(result, Err(ScrapeError::EmptyPdf)));

        let Ok(Some(stored)) = bad.store().load().await else {
            panic!("previous snapshot lost");
        };
        assert_eq!(stored, first);

        let status = bad.status().snapshot().await;
        assert_eq!(status.failure_count, 1);
        assert_eq!(status.last_error.as_deref(), Some("pdf has no pages"));
    }

    #[tokio::test]
    async fn mirror_dir_receives_copy() {
        let dir = temp_dir();
        let docs = dir.path().join("docs");
        let service =
            service(Arc::new(MockSource::ok()), &dir).with_mirror_dir(Some(docs.clone()));

        let Ok(_) = service.run_once().await else {
            panic!("scrape failed");
        };
        assert!(docs.join("weather.json").exists());
    }
}
