//! Rate provider abstractions and implementations.
//!
//! This module contains:
//! - The `RatesProvider` trait the synchronization engine consumes
//! - The `RatesSessionFactory` trait that scopes a provider to one pass
//! - The finmarket.ru implementation

mod traits;

pub mod finmarket;

// Re-exports
pub use traits::{RatesProvider, RatesSessionFactory};
