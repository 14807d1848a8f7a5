use diesel::prelude::*;

use finrates_core::currencies::Currency;

/// Database model for currencies
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::currencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CurrencyDB {
    pub id: i32,
    pub url_id: i32,
    pub code: String,
    pub name: String,
    pub country: String,
}

impl From<CurrencyDB> for Currency {
    fn from(db: CurrencyDB) -> Self {
        Self {
            id: db.id,
            url_id: db.url_id,
            code: db.code,
            name: db.name,
            country: db.country,
        }
    }
}

impl From<Currency> for CurrencyDB {
    fn from(currency: Currency) -> Self {
        Self {
            id: currency.id,
            url_id: currency.url_id,
            code: currency.code,
            name: currency.name,
            country: currency.country,
        }
    }
}
