//! SQLite storage implementation for the rate history.

mod model;
mod repository;

pub use model::{NewRateDB, RateDB};
pub use repository::RateRepository;
