//! Background scheduler for periodic rate synchronization.
//!
//! Runs a pass at startup, then once per configured interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;
use finrates_core::currencies::CurrencyRepositoryTrait;
use finrates_core::rates::RateRepositoryTrait;
use finrates_core::sync::SyncError;
use finrates_core::Error;

/// Starts the background sync scheduler.
pub fn start_sync_scheduler(state: Arc<AppState>, every: Duration) {
    tokio::spawn(async move {
        info!("Sync scheduler started ({:?} interval)", every);

        // First tick is immediate.
        let mut sync_interval = interval(every);
        sync_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            sync_interval.tick().await;
            run_scheduled_sync(&state);
        }
    });
}

/// Kicks off one pass on the driver's worker thread unless one is running.
fn run_scheduled_sync(state: &AppState) {
    if state.driver.is_updating() {
        debug!("Scheduled sync skipped: a pass is still running");
        return;
    }

    match (state.currencies.count_currencies(), state.rates.latest_date()) {
        (Ok(count), Ok(latest)) => info!(
            "Running scheduled sync: {} currencies, latest rate {}",
            count,
            latest.map_or_else(|| "none".to_string(), |date| date.to_string())
        ),
        (Err(e), _) | (_, Err(e)) => warn!("Could not read store status: {}", e),
    }

    match state.driver.start() {
        Ok(()) => {}
        Err(Error::Sync(SyncError::AlreadyRunning)) => {
            debug!("Scheduled sync skipped: a pass is still running");
        }
        Err(e) => warn!("Scheduled sync failed to start: {}", e),
    }
}
