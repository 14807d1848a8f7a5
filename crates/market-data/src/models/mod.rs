//! Data models for the market data crate.
//!
//! This module contains the records produced by the page parsers:
//! - [`DayRate`] - One row of the "all currencies on one day" snapshot
//! - [`PeriodRate`] - One row of the "one currency over a date range" table
//! - [`DirectoryEntry`] - One row of the currency directory page

mod directory;
mod rates;

pub use directory::DirectoryEntry;
pub use rates::{DayRate, PeriodRate};
