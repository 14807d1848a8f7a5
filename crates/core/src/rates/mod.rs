//! Rates module - stored daily observations and their conflicts.

mod rates_errors;
mod rates_model;
mod rates_traits;

pub use rates_errors::{RateConflict, RateConflicts};
pub use rates_model::{OnConflict, RateObservation, Watermarks};
pub use rates_traits::RateRepositoryTrait;
