//! Rate provider trait definitions.
//!
//! The synchronization engine talks to the rate site only through these two
//! traits, which keeps it testable against scripted pages.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::{DayRate, DirectoryEntry, PeriodRate};

/// One synchronization pass worth of access to a rate source.
///
/// Every method performs exactly one paced page request.
#[async_trait]
pub trait RatesProvider: Send + Sync {
    /// All currencies quoted on `date`.
    async fn day_rates(&self, date: NaiveDate) -> Result<Vec<DayRate>, MarketDataError>;

    /// Quotes of one currency between `from` and `to`, both inclusive.
    ///
    /// `url_id` is the site-specific currency id from the directory page.
    async fn period_rates(
        &self,
        url_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PeriodRate>, MarketDataError>;

    /// Every currency listed on the directory page that carries a link.
    async fn directory(&self) -> Result<Vec<DirectoryEntry>, MarketDataError>;
}

/// Opens a fresh [`RatesProvider`] session.
///
/// Sessions own their network resources; dropping the returned handle tears
/// them down.
pub trait RatesSessionFactory: Send + Sync {
    fn open_session(&self) -> Result<Arc<dyn RatesProvider>, MarketDataError>;
}
