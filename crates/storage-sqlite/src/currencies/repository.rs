use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use finrates_core::currencies::{Currency, CurrencyRepositoryTrait};
use finrates_core::Result;

use super::model::CurrencyDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::currencies;
use crate::utils::chunk_for_sqlite;

#[derive(Clone)]
pub struct CurrencyRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CurrencyRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CurrencyRepositoryTrait for CurrencyRepository {
    fn count_currencies(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        currencies::table.count().get_result(&mut conn).into_core()
    }

    fn list_currencies(&self) -> Result<Vec<Currency>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = currencies::table
            .select(CurrencyDB::as_select())
            .order(currencies::id.asc())
            .load::<CurrencyDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Currency::from).collect())
    }

    fn get_currency(&self, id: i32) -> Result<Option<Currency>> {
        let mut conn = get_connection(&self.pool)?;
        let row = currencies::table
            .find(id)
            .select(CurrencyDB::as_select())
            .first::<CurrencyDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Currency::from))
    }

    fn get_currency_by_code(&self, code: &str) -> Result<Option<Currency>> {
        let mut conn = get_connection(&self.pool)?;
        let row = currencies::table
            .filter(currencies::code.eq(code))
            .order(currencies::id.asc())
            .select(CurrencyDB::as_select())
            .first::<CurrencyDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Currency::from))
    }

    async fn insert_currencies(&self, new_currencies: Vec<Currency>) -> Result<usize> {
        let rows: Vec<CurrencyDB> = new_currencies.into_iter().map(CurrencyDB::from).collect();
        self.writer
            .exec(move |conn| {
                let mut inserted = 0;
                for chunk in chunk_for_sqlite(&rows, 5) {
                    inserted += diesel::insert_into(currencies::table)
                        .values(chunk)
                        .execute(conn)
                        .into_core()?;
                }
                Ok(inserted)
            })
            .await
    }
}
