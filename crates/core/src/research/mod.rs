pub mod store;
pub mod universe;

use crate::research::store::{RefreshOutcome, ResearchStore};
use crate::search::SearchClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// How often the background task re-runs the company research sweep.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Runs one refresh immediately, then every [`REFRESH_INTERVAL`].
pub fn spawn_refresh_task(
    store: Arc<ResearchStore>,
    search: Arc<dyn SearchClient>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
        loop {
            ticker.tick().await;
            let tickers: Vec<&str> = universe::tickers().collect();
            match store
                .refresh(search.as_ref(), &tickers, chrono::Utc::now())
                .await
            {
                RefreshOutcome::SkippedWeekend => {
                    tracing::info!("skipping company research refresh on a weekend")
                }
                RefreshOutcome::Completed { refreshed, failed } => {
                    tracing::info!(refreshed, failed, "company research refreshed")
                }
            }
        }
    })
}

/// How a background refresh task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskExit {
    Returned,
    Panicked,
    Cancelled,
}

/// Waits on the refresh task and logs how it ended.
pub async fn watch_refresh_task(handle: JoinHandle<()>) -> TaskExit {
    match handle.await {
        Ok(()) => {
            tracing::warn!("company research refresh task exited");
            TaskExit::Returned
        }
        Err(err) if err.is_panic() => {
            tracing::error!(error = %err, "company research refresh task panicked");
            TaskExit::Panicked
        }
        Err(err) => {
            tracing::warn!(error = %err, "company research refresh task cancelled");
            TaskExit::Cancelled
        }
    }
}
