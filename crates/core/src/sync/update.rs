//! Fetching rates and writing them to the store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::{stream, StreamExt, TryStreamExt};
use log::{debug, info};

use super::partition::{partition, windows};
use crate::currencies::Currency;
use crate::errors::{Error, Result};
use crate::rates::{OnConflict, RateObservation, RateRepositoryTrait, Watermarks};
use finrates_market_data::{MarketDataError, RatesProvider};

/// Fetches rates through one provider session and stores them.
pub struct RateUpdater {
    provider: Arc<dyn RatesProvider>,
    rates: Arc<dyn RateRepositoryTrait>,
    max_concurrency: usize,
}

impl RateUpdater {
    pub fn new(
        provider: Arc<dyn RatesProvider>,
        rates: Arc<dyn RateRepositoryTrait>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            provider,
            rates,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Fetches the history of one currency between `from` and `to`, inclusive,
    /// and stores it as a single batch that fails on conflicts.
    ///
    /// A window whose history table is empty contributes nothing; the batch
    /// as a whole must not be empty.
    pub async fn update_currency(
        &self,
        currency: &Currency,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<usize> {
        let boundaries = partition(from, to)?;
        let mut observations = Vec::new();

        for window in windows(&boundaries) {
            debug!(
                "Fetching {} history from {} to {}",
                currency.code, window.from, window.to
            );
            let history = match self
                .provider
                .period_rates(currency.url_id, window.from, window.to)
                .await
            {
                Ok(history) => history,
                Err(MarketDataError::EmptyTable { .. }) => {
                    debug!(
                        "No {} history between {} and {}",
                        currency.code, window.from, window.to
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            for rate in history {
                if !window.contains(rate.date) {
                    return Err(Error::Invariant(format!(
                        "{} rate dated {} is outside the requested window {}..{}",
                        currency.code, rate.date, window.from, window.to
                    )));
                }
                observations.push(RateObservation {
                    currency_id: currency.id,
                    date: rate.date,
                    value: rate.rate,
                });
            }
        }

        if observations.is_empty() {
            return Err(Error::Invariant(format!(
                "No {} rates published between {} and {}",
                currency.code, from, to
            )));
        }

        let inserted = self
            .rates
            .insert_rates(observations, OnConflict::Fail)
            .await?;
        info!(
            "Stored {} {} rates from {} to {}",
            inserted, currency.code, from, to
        );
        Ok(inserted)
    }

    /// Brings every currency behind `target` up to it, one history fetch per
    /// currency, at most `max_concurrency` at a time.
    pub async fn update_by_periods(
        &self,
        currencies: &[Currency],
        watermarks: &Watermarks,
        target: NaiveDate,
    ) -> Result<usize> {
        let pending: Vec<(&Currency, NaiveDate)> = currencies
            .iter()
            .filter_map(|currency| {
                let next = watermarks.of(currency.id).succ_opt()?;
                (next <= target).then_some((currency, next))
            })
            .collect();
        info!(
            "Period update of {} currencies up to {}",
            pending.len(),
            target
        );

        let counts: Vec<usize> = stream::iter(pending)
            .map(|(currency, from)| self.update_currency(currency, from, target))
            .buffer_unordered(self.max_concurrency)
            .try_collect()
            .await?;
        Ok(counts.into_iter().sum())
    }

    /// Walks day snapshots from `from` to `to`, inclusive, storing the rates
    /// of tracked currencies. Rows already stored are skipped silently.
    pub async fn update_by_days(
        &self,
        currencies: &[Currency],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<usize> {
        let by_code: HashMap<&str, &Currency> = currencies
            .iter()
            .map(|currency| (currency.code.as_str(), currency))
            .collect();

        let mut inserted = 0;
        for day in from.iter_days().take_while(|day| *day <= to) {
            debug!("Fetching snapshot of {}", day);
            let snapshot = self.provider.day_rates(day).await?;

            let mut observations = Vec::with_capacity(snapshot.len());
            for rate in snapshot {
                match by_code.get(rate.code.as_str()) {
                    Some(currency) => observations.push(RateObservation {
                        currency_id: currency.id,
                        date: day,
                        value: rate.rate,
                    }),
                    None => info!("Untracked currency {} ({}) on {}", rate.code, rate.name, day),
                }
            }

            if observations.is_empty() {
                continue;
            }
            inserted += self
                .rates
                .insert_rates(observations, OnConflict::Ignore)
                .await?;
        }

        info!("Day update from {} to {} stored {} rates", from, to, inserted);
        Ok(inserted)
    }
}
