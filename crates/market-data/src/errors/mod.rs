//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for fetching and parsing pages
//! - [`FailureClass`]: Classification used by callers to report failures

use thiserror::Error;

/// Errors that can occur while fetching or parsing rate pages.
///
/// Nothing in this crate retries. Every variant propagates to the caller,
/// which aborts the current synchronization pass.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// A network error occurred while talking to the rate site.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The site answered with a non-success status code.
    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// The status code returned by the site
        status: u16,
    },

    /// The response body could not be decoded with the page charset.
    #[error("Failed to decode {url} as {encoding}")]
    Decode {
        /// The requested URL
        url: String,
        /// Name of the charset used for decoding
        encoding: &'static str,
    },

    /// A URL still contains template placeholders.
    #[error("Got unformatted URL: {0}")]
    UnformattedUrl(String),

    /// An expected table, row or cell is missing from a page.
    /// The upstream page layout changed.
    #[error("Unexpected structure in {page}: {message}")]
    Structure {
        /// Which page kind was being parsed (day, period, directory)
        page: &'static str,
        /// Description of what was missing
        message: String,
    },

    /// A table was found but holds no rows.
    #[error("Empty table in {page}")]
    EmptyTable {
        /// Which page kind was being parsed
        page: &'static str,
    },

    /// A numeric cell could not be parsed.
    #[error("Invalid {field} value '{value}'")]
    InvalidNumber {
        /// Column name
        field: &'static str,
        /// Raw cell text
        value: String,
    },

    /// A date cell could not be parsed.
    #[error("Invalid date '{0}'")]
    InvalidDate(String),
}

/// Broad classification of a [`MarketDataError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureClass {
    /// Network or HTTP level failure.
    Transport,
    /// The page does not look the way the parsers expect.
    Structural,
    /// The caller broke a precondition.
    Invariant,
}

impl MarketDataError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use finrates_market_data::errors::{FailureClass, MarketDataError};
    ///
    /// let error = MarketDataError::InvalidDate("32.01.2024".to_string());
    /// assert_eq!(error.class(), FailureClass::Structural);
    ///
    /// let error = MarketDataError::UnformattedUrl("https://x/?d={day}".to_string());
    /// assert_eq!(error.class(), FailureClass::Invariant);
    /// ```
    pub fn class(&self) -> FailureClass {
        match self {
            Self::Network(_) | Self::HttpStatus { .. } | Self::Decode { .. } => {
                FailureClass::Transport
            }
            Self::Structure { .. }
            | Self::EmptyTable { .. }
            | Self::InvalidNumber { .. }
            | Self::InvalidDate(_) => FailureClass::Structural,
            Self::UnformattedUrl(_) => FailureClass::Invariant,
        }
    }

    pub(crate) fn structure(page: &'static str, message: impl Into<String>) -> Self {
        Self::Structure {
            page,
            message: message.into(),
        }
    }
}
