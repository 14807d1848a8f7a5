//! Utility functions for SQLite storage operations.

use chrono::NaiveDate;
use finrates_core::errors::{DatabaseError, Error, Result};

/// Storage format of every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum number of bound parameters per statement.
///
/// SQLite builds may be compiled with a limit as low as 999
/// (SQLITE_MAX_VARIABLE_NUMBER), so batches stay well under it.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 900;

/// Chunk a slice so that each chunk binds at most
/// [`SQLITE_MAX_PARAMS_CHUNK`] parameters at `params_per_item` per element.
pub fn chunk_for_sqlite<T>(items: &[T], params_per_item: usize) -> impl Iterator<Item = &[T]> {
    let size = (SQLITE_MAX_PARAMS_CHUNK / params_per_item.max(1)).max(1);
    items.chunks(size)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
        Error::Database(DatabaseError::Internal(format!(
            "Stored date '{}' is not {}: {}",
            raw, DATE_FORMAT, e
        )))
    })
}
