//! First-run population of the currency catalog.

use std::collections::HashSet;

use log::{debug, info};

use crate::constants::reference_day;
use crate::currencies::{Currency, CurrencyRepositoryTrait};
use crate::errors::{Error, Result};
use finrates_market_data::RatesProvider;

/// Builds the catalog from the directory page, keeping only currencies that
/// are quoted on the reference day.
pub struct CatalogBootstrapper<'a> {
    provider: &'a dyn RatesProvider,
    currencies: &'a dyn CurrencyRepositoryTrait,
}

impl<'a> CatalogBootstrapper<'a> {
    pub fn new(provider: &'a dyn RatesProvider, currencies: &'a dyn CurrencyRepositoryTrait) -> Self {
        Self {
            provider,
            currencies,
        }
    }

    /// Fetches, filters and stores the catalog. Returns the number of currencies stored.
    pub async fn run(&self) -> Result<usize> {
        let reference = reference_day();
        let quoted: HashSet<String> = self
            .provider
            .day_rates(reference)
            .await?
            .into_iter()
            .map(|rate| rate.code)
            .collect();
        debug!("{} currencies quoted on {}", quoted.len(), reference);

        let catalog: Vec<Currency> = self
            .provider
            .directory()
            .await?
            .into_iter()
            .filter(|entry| {
                let tracked = quoted.contains(&entry.code);
                if !tracked {
                    debug!("Skipping {} ({}): not quoted on {}", entry.code, entry.name, reference);
                }
                tracked
            })
            .map(Currency::from)
            .collect();

        if catalog.is_empty() {
            return Err(Error::Invariant(format!(
                "No directory entry is quoted on {}",
                reference
            )));
        }

        info!("Storing {} currencies", catalog.len());
        self.currencies.insert_currencies(catalog).await
    }
}
