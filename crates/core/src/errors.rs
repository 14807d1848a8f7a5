//! Core error types for finrates.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

use crate::rates::RateConflicts;
use crate::sync::SyncError;
use finrates_market_data::{FailureClass, MarketDataError};

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for finrates.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Rate conflicts: {0}")]
    RateConflicts(#[from] RateConflicts),

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// How an [`Error`] is reported when it aborts a synchronization pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Network or HTTP failure.
    Transport,
    /// A page did not have the expected shape.
    Structural,
    /// Rows that would overwrite stored history.
    Conflict,
    /// A broken internal expectation or caller precondition.
    Invariant,
    /// The store failed.
    Storage,
    /// Anything else.
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MarketData(error) => match error.class() {
                FailureClass::Transport => ErrorKind::Transport,
                FailureClass::Structural => ErrorKind::Structural,
                FailureClass::Invariant => ErrorKind::Invariant,
            },
            Error::RateConflicts(_) => ErrorKind::Conflict,
            Error::Invariant(_) => ErrorKind::Invariant,
            Error::Database(_) => ErrorKind::Storage,
            Error::Sync(_) | Error::InvalidConfigValue(_) => ErrorKind::Other,
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}
