//! Finrates Market Data Crate
//!
//! This crate fetches and parses the HTML pages that publish daily exchange
//! rates, and hands normalized records to the synchronization engine.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Globally paced page requests through a single [`RateLimiter`]
//! - windows-1251 page decoding
//! - Parsers for the day snapshot, period history and directory tables
//!
//! # Architecture
//!
//! ```text
//! +--------------------+
//! | RatesSessionFactory|  (one session per synchronization pass)
//! +--------------------+
//!           |
//!           v
//! +--------------------+     +------------------+
//! |   RatesProvider    | --> |   PageFetcher    |  (rate limited GET + decode)
//! +--------------------+     +------------------+
//!           |
//!           v
//! +--------------------+
//! |   Table parsers    |  (DayRate, PeriodRate, DirectoryEntry)
//! +--------------------+
//! ```
//!
//! # Core Types
//!
//! - [`DayRate`] - One currency on one day, per-unit values
//! - [`PeriodRate`] - One day of a single currency's history, per-unit values
//! - [`DirectoryEntry`] - Catalog data for one currency
//! - [`MarketDataError`] - Transport, structural and precondition failures

pub mod client;
pub mod errors;
pub mod models;
pub mod provider;

// Re-export all public types from models
pub use models::{DayRate, DirectoryEntry, PeriodRate};

// Re-export client types
pub use client::{FetchOptions, PageFetcher, RateLimiter, DEFAULT_REQUEST_DELAY};

// Re-export error types
pub use errors::{FailureClass, MarketDataError};

// Re-export provider types
pub use provider::finmarket::{Finmarket, FinmarketConfig, FinmarketSession};
pub use provider::{RatesProvider, RatesSessionFactory};
