//! SQLite storage implementation for finrates.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `finrates-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for the currency catalog and the rate history
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!          core (domain, sync engine)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! All writes go through a single writer actor ([`WriteHandle`]), so batches
//! are serialized even when the sync engine fetches currencies concurrently.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod currencies;
pub mod rates;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export repositories
pub use currencies::CurrencyRepository;
pub use rates::RateRepository;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from finrates-core for convenience
pub use finrates_core::errors::{DatabaseError, Error, Result};
