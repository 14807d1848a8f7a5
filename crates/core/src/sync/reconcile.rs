//! Backfilling currencies that fell behind the rest of the store.

use chrono::NaiveDate;
use futures::{stream, StreamExt, TryStreamExt};
use log::{info, warn};

use super::update::RateUpdater;
use crate::currencies::Currency;
use crate::errors::Result;
use crate::rates::Watermarks;

/// A currency lagging the global watermark and the range that fills it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backfill {
    pub currency_id: i32,
    pub code: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Lists every currency whose latest stored date trails the global one by
/// more than one day. Currencies without rows count from the epoch floor.
pub fn plan_backfills(currencies: &[Currency], watermarks: &Watermarks) -> Vec<Backfill> {
    let global = watermarks.global();
    currencies
        .iter()
        .filter_map(|currency| {
            let own = watermarks.of(currency.id);
            if (global - own).num_days() <= 1 {
                return None;
            }
            Some(Backfill {
                currency_id: currency.id,
                code: currency.code.clone(),
                from: own.succ_opt()?,
                to: global,
            })
        })
        .collect()
}

/// Runs the backfills of [`plan_backfills`] through a [`RateUpdater`].
pub struct GapReconciler<'a> {
    updater: &'a RateUpdater,
}

impl<'a> GapReconciler<'a> {
    pub fn new(updater: &'a RateUpdater) -> Self {
        Self { updater }
    }

    /// Backfills every lagging currency. Returns the backfills performed and
    /// the number of rows they stored.
    pub async fn run(
        &self,
        currencies: &[Currency],
        watermarks: &Watermarks,
    ) -> Result<(Vec<Backfill>, usize)> {
        let plan = plan_backfills(currencies, watermarks);
        if plan.is_empty() {
            info!("All currencies are level with {}", watermarks.global());
            return Ok((plan, 0));
        }

        for backfill in &plan {
            warn!(
                "{} lags behind: backfilling {} to {}",
                backfill.code, backfill.from, backfill.to
            );
        }

        let jobs: Vec<(&Currency, &Backfill)> = plan
            .iter()
            .filter_map(|backfill| {
                currencies
                    .iter()
                    .find(|currency| currency.id == backfill.currency_id)
                    .map(|currency| (currency, backfill))
            })
            .collect();

        let counts: Vec<usize> = stream::iter(jobs)
            .map(|(currency, backfill)| {
                self.updater
                    .update_currency(currency, backfill.from, backfill.to)
            })
            .buffer_unordered(self.updater.max_concurrency())
            .try_collect()
            .await?;

        Ok((plan, counts.into_iter().sum()))
    }
}
