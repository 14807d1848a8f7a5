//! finmarket.ru rate provider.
//!
//! The site publishes the Central Bank of Russia rates as HTML pages in
//! windows-1251. Three pages are used:
//! - the day page: all currencies on one date
//! - the period page: one currency over a date range
//! - the banknote directory: ids, codes and countries of all currencies

mod day_table;
mod directory;
mod html;
mod numbers;
mod period_table;
mod urls;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use crate::client::{PageFetcher, RateLimiter, DEFAULT_REQUEST_DELAY};
use crate::errors::MarketDataError;
use crate::models::{DayRate, DirectoryEntry, PeriodRate};
use crate::provider::{RatesProvider, RatesSessionFactory};

pub use day_table::parse_day_table;
pub use directory::{normalize_name, parse_directory_table};
pub use numbers::{parse_amount, parse_decimal, per_unit};
pub use period_table::parse_period_table;
pub use urls::{FinmarketUrls, DEFAULT_BASE_URL};

/// Provider ID constant
pub const PROVIDER_ID: &str = "FINMARKET";

/// Settings for [`Finmarket`].
#[derive(Clone, Debug)]
pub struct FinmarketConfig {
    /// Host the pages are requested from.
    pub base_url: String,
    /// Minimum pause between two requests.
    pub request_delay: Duration,
}

impl Default for FinmarketConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

/// Session factory for finmarket.ru.
///
/// Holds the one rate limiter shared by every session it opens.
///
/// # Example
///
/// ```ignore
/// use finrates_market_data::provider::finmarket::{Finmarket, FinmarketConfig};
/// use finrates_market_data::RatesSessionFactory;
///
/// let finmarket = Finmarket::new(FinmarketConfig::default());
/// let session = finmarket.open_session()?;
/// let rates = session.day_rates(date).await?;
/// ```
pub struct Finmarket {
    urls: FinmarketUrls,
    limiter: Arc<RateLimiter>,
}

impl Finmarket {
    pub fn new(config: FinmarketConfig) -> Self {
        Self {
            urls: FinmarketUrls::new(config.base_url),
            limiter: Arc::new(RateLimiter::new(config.request_delay)),
        }
    }

    pub fn urls(&self) -> &FinmarketUrls {
        &self.urls
    }

    pub fn limiter(&self) -> Arc<RateLimiter> {
        Arc::clone(&self.limiter)
    }
}

impl RatesSessionFactory for Finmarket {
    fn open_session(&self) -> Result<Arc<dyn RatesProvider>, MarketDataError> {
        debug!("Opening {} session", PROVIDER_ID);
        Ok(Arc::new(FinmarketSession {
            fetcher: PageFetcher::new(self.limiter())?,
            urls: self.urls.clone(),
        }))
    }
}

/// A single pass worth of finmarket.ru access.
pub struct FinmarketSession {
    fetcher: PageFetcher,
    urls: FinmarketUrls,
}

impl Drop for FinmarketSession {
    fn drop(&mut self) {
        debug!("Closing {} session", PROVIDER_ID);
    }
}

#[async_trait]
impl RatesProvider for FinmarketSession {
    async fn day_rates(&self, date: NaiveDate) -> Result<Vec<DayRate>, MarketDataError> {
        let document = self.fetcher.fetch(&self.urls.day(date)).await?;
        let rates = parse_day_table(&document)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rates)
    }

    async fn period_rates(
        &self,
        url_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PeriodRate>, MarketDataError> {
        let document = self
            .fetcher
            .fetch(&self.urls.period(url_id, from, to))
            .await?;
        let rates = parse_period_table(&document)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rates)
    }

    async fn directory(&self) -> Result<Vec<DirectoryEntry>, MarketDataError> {
        let document = self.fetcher.fetch(&self.urls.directory()).await?;
        let entries = parse_directory_table(&document)?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
