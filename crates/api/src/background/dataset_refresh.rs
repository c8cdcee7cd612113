//! Scheduled refresh of the listings dataset.
//!
//! Registers a cron job with `tokio-cron-scheduler` that launches the
//! external updater on every tick. The freshness timestamp is moved forward
//! when a refresh starts, not when it finishes, so `/updated` reports the
//! last attempt.

use std::sync::Arc;

use pricesorter_core::freshness::FreshnessTracker;
use pricesorter_core::updater::{UpdateOutcome, Updater};
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tokio_util::sync::CancellationToken;

/// Start one refresh in the background.
///
/// Records the trigger time in `freshness` before the updater runs. The
/// returned handle resolves once the updater exits; failures are logged here
/// and never stop the server.
pub fn trigger_refresh(
    updater: Arc<dyn Updater>,
    freshness: &FreshnessTracker,
) -> JoinHandle<UpdateOutcome> {
    let started_at = freshness.touch();
    tracing::info!(last_updated = started_at, "Updating database...");

    tokio::spawn(async move {
        let outcome = updater.trigger().await;
        match &outcome {
            UpdateOutcome::Success => tracing::info!("Dataset refresh finished"),
            UpdateOutcome::Failure(reason) => {
                tracing::error!(reason = %reason, "Updating database failed");
            }
        }
        outcome
    })
}

/// Run the refresh scheduler until `cancel` is triggered.
///
/// `schedule` is a seconds-first cron expression evaluated in UTC. An
/// invalid expression is returned as an error before anything is scheduled.
pub async fn run(
    schedule: String,
    updater: Arc<dyn Updater>,
    freshness: Arc<FreshnessTracker>,
    cancel: CancellationToken,
) -> Result<(), JobSchedulerError> {
    let mut scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule.as_str(), move |_id, _scheduler| {
        let updater = Arc::clone(&updater);
        let freshness = Arc::clone(&freshness);
        Box::pin(async move {
            // The job does not wait on the updater; ticks stay on time even
            // when a run overlaps the next one.
            drop(trigger_refresh(updater, &freshness));
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(schedule = %schedule, "Dataset refresh scheduler started");

    cancel.cancelled().await;
    tracing::info!("Dataset refresh scheduler stopping");
    scheduler.shutdown().await?;

    Ok(())
}
