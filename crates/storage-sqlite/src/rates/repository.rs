use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use finrates_core::rates::{
    OnConflict, RateConflict, RateConflicts, RateObservation, RateRepositoryTrait,
};
use finrates_core::{Error, Result};

use super::model::{NewRateDB, RateDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{is_unique_violation, IntoCore, StorageError};
use crate::schema::rates;
use crate::utils::{chunk_for_sqlite, format_date, parse_date};

#[derive(Clone)]
pub struct RateRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl RateRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    pub fn count_rates(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        rates::table.count().get_result(&mut conn).into_core()
    }
}

/// Inserts rows one at a time, keeping the stored row on collisions.
fn insert_reporting_conflicts(
    conn: &mut SqliteConnection,
    observations: &[RateObservation],
) -> Result<(usize, Vec<RateConflict>)> {
    let mut inserted = 0;
    let mut conflicts = Vec::new();
    for observation in observations {
        let result = diesel::insert_into(rates::table)
            .values(NewRateDB::from(observation))
            .execute(conn);
        match result {
            Ok(count) => inserted += count,
            Err(e) if is_unique_violation(&e) => conflicts.push(RateConflict {
                currency_id: observation.currency_id,
                date: observation.date,
                value: observation.value,
            }),
            Err(e) => return Err(StorageError::from(e).into()),
        }
    }
    Ok((inserted, conflicts))
}

fn insert_ignoring_conflicts(
    conn: &mut SqliteConnection,
    observations: &[RateObservation],
) -> Result<usize> {
    let rows: Vec<NewRateDB> = observations.iter().map(NewRateDB::from).collect();
    let mut inserted = 0;
    for chunk in chunk_for_sqlite(&rows, 3) {
        inserted += diesel::insert_or_ignore_into(rates::table)
            .values(chunk)
            .execute(conn)
            .into_core()?;
    }
    Ok(inserted)
}

#[async_trait]
impl RateRepositoryTrait for RateRepository {
    fn latest_date(&self) -> Result<Option<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        let latest: Option<String> = rates::table
            .select(max(rates::date))
            .first(&mut conn)
            .into_core()?;
        latest.as_deref().map(parse_date).transpose()
    }

    fn latest_dates_by_currency(&self) -> Result<HashMap<i32, NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<(i32, Option<String>)> = rates::table
            .group_by(rates::currency_id)
            .select((rates::currency_id, max(rates::date)))
            .load(&mut conn)
            .into_core()?;

        let mut latest = HashMap::with_capacity(rows.len());
        for (currency_id, date) in rows {
            if let Some(date) = date {
                latest.insert(currency_id, parse_date(&date)?);
            }
        }
        Ok(latest)
    }

    fn get_rates(
        &self,
        currency_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RateObservation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = rates::table
            .filter(rates::currency_id.eq(currency_id))
            .filter(rates::date.ge(format_date(from)))
            .filter(rates::date.le(format_date(to)))
            .order(rates::date.asc())
            .select(RateDB::as_select())
            .load::<RateDB>(&mut conn)
            .into_core()?;
        rows.into_iter().map(RateDB::into_observation).collect()
    }

    async fn insert_rates(
        &self,
        observations: Vec<RateObservation>,
        on_conflict: OnConflict,
    ) -> Result<usize> {
        if observations.is_empty() {
            return Ok(0);
        }

        match on_conflict {
            OnConflict::Ignore => {
                self.writer
                    .exec(move |conn| insert_ignoring_conflicts(conn, &observations))
                    .await
            }
            OnConflict::Fail => {
                let (inserted, conflicts) = self
                    .writer
                    .exec(move |conn| insert_reporting_conflicts(conn, &observations))
                    .await?;
                if conflicts.is_empty() {
                    return Ok(inserted);
                }
                debug!(
                    "Stored {} rates, {} collided with stored ones",
                    inserted,
                    conflicts.len()
                );
                Err(Error::RateConflicts(RateConflicts(conflicts)))
            }
        }
    }
}
