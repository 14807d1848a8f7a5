use async_trait::async_trait;

use super::currencies_model::Currency;
use crate::errors::Result;

/// Trait defining the contract for currency catalog persistence.
#[async_trait]
pub trait CurrencyRepositoryTrait: Send + Sync {
    fn count_currencies(&self) -> Result<i64>;
    fn list_currencies(&self) -> Result<Vec<Currency>>;
    fn get_currency(&self, id: i32) -> Result<Option<Currency>>;
    fn get_currency_by_code(&self, code: &str) -> Result<Option<Currency>>;
    /// Inserts the whole catalog in one transaction. Returns the number of rows written.
    async fn insert_currencies(&self, currencies: Vec<Currency>) -> Result<usize>;
}
