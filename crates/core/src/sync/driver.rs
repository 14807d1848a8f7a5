//! The synchronization driver: one pass at a time, each pass in order
//! bootstrap, reconcile, strategy selection, update.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use chrono::{Local, NaiveDate};
use log::{error, info, warn};

use super::bootstrap::CatalogBootstrapper;
use super::reconcile::{Backfill, GapReconciler};
use super::strategy::{select_strategy, UpdateStrategy};
use super::update::RateUpdater;
use super::SyncError;
use crate::constants::DEFAULT_MAX_CONCURRENCY;
use crate::currencies::CurrencyRepositoryTrait;
use crate::errors::Result;
use crate::rates::RateRepositoryTrait;
use finrates_market_data::RatesSessionFactory;

const WORKER_THREAD_NAME: &str = "finrates-sync";

/// Where the driver currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    /// Covers the catalog check, and the bootstrap itself when the catalog is empty.
    Bootstrapping,
    Reconciling,
    SelectingStrategy,
    Updating(UpdateStrategy),
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Currencies fetched concurrently by the period strategy and the reconciler.
    pub max_concurrency: usize,
    /// Always use the day strategy for the forward update.
    pub force_day_update: bool,
    /// Last day to fetch. Defaults to yesterday in local time.
    pub target_date: Option<NaiveDate>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            force_day_update: false,
            target_date: None,
        }
    }
}

/// What one pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Currencies stored by the bootstrap, zero when the catalog already existed.
    pub bootstrapped: usize,
    pub backfills: Vec<Backfill>,
    /// Rows stored by the backfills.
    pub backfilled: usize,
    pub strategy: Option<UpdateStrategy>,
    pub target: Option<NaiveDate>,
    /// Rows stored by the forward update.
    pub inserted: usize,
}

/// Keeps the driver out of `Idle` for as long as it lives.
struct RunGuard {
    state: Arc<Mutex<SyncState>>,
}

impl RunGuard {
    fn try_acquire(state: &Arc<Mutex<SyncState>>) -> Option<Self> {
        let mut current = state.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != SyncState::Idle {
            return None;
        }
        *current = SyncState::Bootstrapping;
        Some(Self {
            state: Arc::clone(state),
        })
    }

    fn set(&self, next: SyncState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = SyncState::Idle;
    }
}

/// Runs synchronization passes against one store and one rate source.
pub struct SyncDriver {
    currencies: Arc<dyn CurrencyRepositoryTrait>,
    rates: Arc<dyn RateRepositoryTrait>,
    sessions: Arc<dyn RatesSessionFactory>,
    config: SyncConfig,
    state: Arc<Mutex<SyncState>>,
}

impl SyncDriver {
    pub fn new(
        currencies: Arc<dyn CurrencyRepositoryTrait>,
        rates: Arc<dyn RateRepositoryTrait>,
        sessions: Arc<dyn RatesSessionFactory>,
        config: SyncConfig,
    ) -> Self {
        Self {
            currencies,
            rates,
            sessions,
            config,
            state: Arc::new(Mutex::new(SyncState::Idle)),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn state(&self) -> SyncState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_updating(&self) -> bool {
        self.state() != SyncState::Idle
    }

    /// Starts a pass on a dedicated worker thread and returns immediately.
    ///
    /// Fails with [`SyncError::AlreadyRunning`] while another pass is in progress.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        let guard = RunGuard::try_acquire(&self.state).ok_or(SyncError::AlreadyRunning)?;
        let driver = Arc::clone(self);

        thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        error!("Failed to build the sync runtime: {}", e);
                        return;
                    }
                };
                match runtime.block_on(driver.run_pass(&guard)) {
                    Ok(report) => info!("Synchronization finished: {:?}", report),
                    Err(e) => error!("Synchronization failed ({:?}): {}", e.kind(), e),
                }
                drop(guard);
            })
            .map_err(|e| SyncError::WorkerSpawn(e.to_string()))?;
        Ok(())
    }

    /// Runs one pass on the current task.
    ///
    /// Fails with [`SyncError::AlreadyRunning`] while another pass is in progress.
    pub async fn run(&self) -> Result<SyncReport> {
        let guard = RunGuard::try_acquire(&self.state).ok_or(SyncError::AlreadyRunning)?;
        self.run_pass(&guard).await
    }

    async fn run_pass(&self, guard: &RunGuard) -> Result<SyncReport> {
        info!("Started updating");
        let session = self.sessions.open_session()?;
        let mut report = SyncReport::default();

        if self.currencies.count_currencies()? == 0 {
            warn!("Currency catalog is empty, bootstrapping it. This should happen once");
            report.bootstrapped =
                CatalogBootstrapper::new(session.as_ref(), self.currencies.as_ref())
                    .run()
                    .await?;
        }
        let catalog = self.currencies.list_currencies()?;
        let updater = RateUpdater::new(
            Arc::clone(&session),
            Arc::clone(&self.rates),
            self.config.max_concurrency,
        );

        guard.set(SyncState::Reconciling);
        let before = self.rates.watermarks()?;
        let (backfills, backfilled) = GapReconciler::new(&updater).run(&catalog, &before).await?;
        report.backfills = backfills;
        report.backfilled = backfilled;

        guard.set(SyncState::SelectingStrategy);
        let watermarks = self.rates.watermarks()?;
        let target = match self.config.target_date {
            Some(target) => target,
            None => yesterday(),
        };
        report.target = Some(target);
        let start = watermarks.lowest(&catalog);
        let gap = (target - start).num_days();
        if gap <= 0 {
            info!("Rates are current up to {}, nothing to update", start);
            return Ok(report);
        }

        let strategy = select_strategy(gap, catalog.len(), self.config.force_day_update);
        info!(
            "{} day(s) behind for {} currencies, updating by {}",
            gap,
            catalog.len(),
            strategy
        );
        guard.set(SyncState::Updating(strategy));
        report.strategy = Some(strategy);

        report.inserted = match strategy {
            UpdateStrategy::Period => {
                updater
                    .update_by_periods(&catalog, &watermarks, target)
                    .await?
            }
            UpdateStrategy::Day => match start.succ_opt() {
                Some(from) => updater.update_by_days(&catalog, from, target).await?,
                None => 0,
            },
        };

        info!(
            "Updating finished: {} backfill(s), {} rate(s) stored up to {}",
            report.backfills.len(),
            report.inserted,
            target
        );
        Ok(report)
    }
}

fn yesterday() -> NaiveDate {
    let today = Local::now().date_naive();
    today.pred_opt().unwrap_or(today)
}
