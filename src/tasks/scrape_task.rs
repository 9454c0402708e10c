//! Scheduled scraping task
//!
//! Runs [`ScrapeService::run_once`] according to a [`ScheduleConfig`]. A failed
//! attempt is logged by the service and the loop simply waits for the next slot.

use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::{debug, info};

use crate::schedule::ScheduleConfig;
use crate::service::ScrapeService;

/// Spawn a background task that scrapes on the given schedule.
///
/// Returns a `JoinHandle` that can be used to abort the task when shutting down.
///
/// # Example
///
/// ```ignore
/// let handle = spawn_scrape_task(service, ScheduleConfig::default());
///
/// // On shutdown:
/// handle.abort();
/// ```
pub fn spawn_scrape_task(
    service: Arc<ScrapeService>,
    config: ScheduleConfig,
) -> tokio::task::JoinHandle<()> {
    info!(
        schedule = ?config.schedule,
        run_on_startup = config.run_on_startup,
        "Starting scrape scheduler"
    );

    tokio::spawn(async move {
        if config.run_on_startup {
            let _ = service.run_once().await;
        }

        loop {
            let now = Local::now();
            let next = config.schedule.next_run_at(&now);
            let delay = config.schedule.delay_until_next(&now);

            service
                .status()
                .set_next_run(Some(next.with_timezone(&Utc)))
                .await;
            debug!(next_run = %next, delay_secs = delay.as_secs(), "Waiting for next scrape");

            tokio::time::sleep(delay).await;
            let _ = service.run_once().await;
        }
    })
}
