//! Sync module - keeps the local rate history current.
//!
//! A pass bootstraps the catalog when it is empty, backfills currencies that
//! fell behind, then brings every currency up to the target day with the
//! cheaper of the period and day strategies.

mod bootstrap;
mod driver;
mod partition;
mod reconcile;
mod strategy;
mod update;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

pub use bootstrap::CatalogBootstrapper;
pub use driver::{SyncConfig, SyncDriver, SyncReport, SyncState};
pub use partition::{partition, windows, DateWindow};
pub use reconcile::{plan_backfills, Backfill, GapReconciler};
pub use strategy::{select_strategy, UpdateStrategy};
pub use update::RateUpdater;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("A synchronization pass is already running")]
    AlreadyRunning,

    #[error("Failed to spawn the sync worker: {0}")]
    WorkerSpawn(String),
}
