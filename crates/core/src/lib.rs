//! Finrates Core - Domain entities, repository traits and the sync engine.
//!
//! This crate holds the currency catalog and rate history models and the
//! synchronization engine that keeps the local history current. It is
//! database-agnostic and defines traits that are implemented by the
//! `storage-sqlite` crate.

pub mod constants;
pub mod currencies;
pub mod errors;
pub mod rates;
pub mod sync;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
