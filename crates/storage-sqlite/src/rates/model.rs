use diesel::prelude::*;

use finrates_core::rates::RateObservation;
use finrates_core::Result;

use crate::utils::{format_date, parse_date};

/// Database model for stored rates
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RateDB {
    pub id: i32,
    pub currency_id: i32,
    pub date: String,
    pub value: f64,
}

/// Insert model for rates; the row id is assigned by SQLite.
#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::rates)]
pub struct NewRateDB {
    pub currency_id: i32,
    pub date: String,
    pub value: f64,
}

impl RateDB {
    pub fn into_observation(self) -> Result<RateObservation> {
        Ok(RateObservation {
            currency_id: self.currency_id,
            date: parse_date(&self.date)?,
            value: self.value,
        })
    }
}

impl From<&RateObservation> for NewRateDB {
    fn from(observation: &RateObservation) -> Self {
        Self {
            currency_id: observation.currency_id,
            date: format_date(observation.date),
            value: observation.value,
        }
    }
}
