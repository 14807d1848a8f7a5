use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::rates_model::{OnConflict, RateObservation, Watermarks};
use crate::errors::Result;

/// Trait defining the contract for rate history persistence.
#[async_trait]
pub trait RateRepositoryTrait: Send + Sync {
    /// Latest stored date across all currencies.
    fn latest_date(&self) -> Result<Option<NaiveDate>>;

    /// Latest stored date of every currency that has at least one observation.
    fn latest_dates_by_currency(&self) -> Result<HashMap<i32, NaiveDate>>;

    /// Observations of one currency between `from` and `to`, inclusive, ordered by date.
    fn get_rates(&self, currency_id: i32, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<RateObservation>>;

    /// Inserts a batch and returns the number of new rows.
    ///
    /// With [`OnConflict::Fail`], rows colliding with stored ones are skipped,
    /// the rest are committed, and the call then fails with
    /// [`crate::Error::RateConflicts`] listing every skipped row.
    async fn insert_rates(
        &self,
        observations: Vec<RateObservation>,
        on_conflict: OnConflict,
    ) -> Result<usize>;

    fn watermarks(&self) -> Result<Watermarks> {
        Ok(Watermarks {
            global: self.latest_date()?,
            per_currency: self.latest_dates_by_currency()?,
        })
    }
}
