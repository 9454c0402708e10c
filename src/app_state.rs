//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::StatusTracker;
use crate::persistence::SnapshotStore;
use crate::render::DashboardRenderer;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Snapshot file, read on every request.
    pub store: SnapshotStore,
    /// Scheduler outcomes for `/api/status`.
    pub status: Arc<StatusTracker>,
    /// Compiled dashboard template.
    pub renderer: Arc<DashboardRenderer>,
}
