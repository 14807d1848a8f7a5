//! Currencies module - the catalog of tracked currencies.

mod currencies_model;
mod currencies_traits;

pub use currencies_model::Currency;
pub use currencies_traits::CurrencyRepositoryTrait;
