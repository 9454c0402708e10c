//! Outcome bookkeeping for scheduled scrape attempts.
//!
//! [`StatusTracker`] is shared between the scheduler task (writer) and the
//! `/api/status` handler (reader).

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// Point-in-time view of the scraper's history since process start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScrapeStatus {
    /// Number of attempts that produced and saved a snapshot.
    pub success_count: u64,
    /// Number of attempts that failed at any stage.
    pub failure_count: u64,
    /// Start of the most recent attempt.
    pub last_attempt: Option<DateTime<Utc>>,
    /// Start of the most recent successful attempt.
    pub last_success: Option<DateTime<Utc>>,
    /// Error message of the most recent failed attempt. Cleared on success.
    pub last_error: Option<String>,
    /// When the scheduler will try next, if a scheduler is running.
    pub next_run: Option<DateTime<Utc>>,
}

/// Concurrent holder for [`ScrapeStatus`].
#[derive(Debug, Default)]
pub struct StatusTracker {
    inner: RwLock<ScrapeStatus>,
}

impl StatusTracker {
    /// Creates a tracker with empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful attempt started at `at`.
    pub async fn record_success(&self, at: DateTime<Utc>) {
        let mut status = self.inner.write().await;
        status.success_count = status.success_count.saturating_add(1);
        status.last_attempt = Some(at);
        status.last_success = Some(at);
        status.last_error = None;
    }

    /// Records a failed attempt started at `at`.
    pub async fn record_failure(&self, at: DateTime<Utc>, error: &str) {
        let mut status = self.inner.write().await;
        status.failure_count = status.failure_count.saturating_add(1);
        status.last_attempt = Some(at);
        status.last_error = Some(error.to_string());
    }

    /// Sets the next scheduled run.
    pub async fn set_next_run(&self, next: Option<DateTime<Utc>>) {
        self.inner.write().await.next_run = next;
    }

    /// Returns a copy of the current status.
    pub async fn snapshot(&self) -> ScrapeStatus {
        self.inner.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_tracker_is_empty() {
        let tracker = StatusTracker::new();
        assert_eq!(tracker.snapshot().await, ScrapeStatus::default());
    }

    #[tokio::test]
    async fn failure_then_success_clears_error() {
        let tracker = StatusTracker::new();
        let t1 = Utc::now();
        tracker.record_failure(t1, "pdf has no pages").await;

        let status = tracker.snapshot().await;
        assert_eq!(status.failure_count, 1);
        assert_eq!(status.last_error.as_deref(), Some("pdf has no pages"));
        assert!(status.last_success.is_none());

        let t2 = Utc::now();
        tracker.record_success(t2).await;

        let status = tracker.snapshot().await;
        assert_eq!(status.success_count, 1);
        assert_eq!(status.failure_count, 1);
        assert_eq!(status.last_success, Some(t2));
        assert_eq!(status.last_attempt, Some(t2));
        assert!(status.last_error.is_none());
    }

    #[tokio::test]
    async fn next_run_is_overwritten() {
        let tracker = StatusTracker::new();
        let next = Utc::now();
        tracker.set_next_run(Some(next)).await;
        assert_eq!(tracker.snapshot().await.next_run, Some(next));
        tracker.set_next_run(None).await;
        assert!(tracker.snapshot().await.next_run.is_none());
    }
}
