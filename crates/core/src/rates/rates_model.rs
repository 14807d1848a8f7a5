use std::collections::HashMap;

use chrono::NaiveDate;

use crate::constants::epoch_floor;
use crate::currencies::Currency;

/// One currency's per-unit rate on one day.
///
/// At most one observation exists per `(currency_id, date)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateObservation {
    pub currency_id: i32,
    pub date: NaiveDate,
    pub value: f64,
}

/// What a batch insert does with a row whose `(currency_id, date)` already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnConflict {
    /// Keep the stored row, report the incoming one as a conflict.
    Fail,
    /// Keep the stored row, drop the incoming one silently.
    Ignore,
}

/// Latest stored dates, globally and per currency.
///
/// Missing dates read as the epoch floor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watermarks {
    pub global: Option<NaiveDate>,
    pub per_currency: HashMap<i32, NaiveDate>,
}

impl Watermarks {
    pub fn global(&self) -> NaiveDate {
        self.global.unwrap_or_else(epoch_floor)
    }

    pub fn of(&self, currency_id: i32) -> NaiveDate {
        self.per_currency
            .get(&currency_id)
            .copied()
            .unwrap_or_else(epoch_floor)
    }

    /// The oldest watermark among `currencies`, or the global one when the
    /// list is empty.
    pub fn lowest(&self, currencies: &[Currency]) -> NaiveDate {
        currencies
            .iter()
            .map(|currency| self.of(currency.id))
            .min()
            .unwrap_or_else(|| self.global())
    }
}
