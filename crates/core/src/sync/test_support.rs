//! In-memory repositories and a scripted rate source for sync tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use crate::currencies::{Currency, CurrencyRepositoryTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::rates::{OnConflict, RateConflict, RateConflicts, RateObservation, RateRepositoryTrait};
use finrates_market_data::{
    DayRate, DirectoryEntry, MarketDataError, PeriodRate, RatesProvider, RatesSessionFactory,
};

// =========================================================================
// Builders
// =========================================================================

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn day_rate(code: &str, rate: f64) -> DayRate {
    DayRate {
        code: code.to_string(),
        name: code.to_string(),
        amount: 1,
        rate,
        change: 0.0,
    }
}

pub fn period_rate(date: NaiveDate, rate: f64) -> PeriodRate {
    PeriodRate {
        date,
        amount: 1,
        rate,
        change: 0.0,
    }
}

pub fn directory_entry(id: i32, url_id: i32, code: &str) -> DirectoryEntry {
    DirectoryEntry {
        id,
        url_id,
        code: code.to_string(),
        name: code.to_string(),
        country: String::new(),
    }
}

pub fn currency(id: i32, url_id: i32, code: &str) -> Currency {
    Currency::from(directory_entry(id, url_id, code))
}

pub fn observation(currency_id: i32, date: NaiveDate, value: f64) -> RateObservation {
    RateObservation {
        currency_id,
        date,
        value,
    }
}

// =========================================================================
// Mock CurrencyRepository
// =========================================================================

#[derive(Clone, Default)]
pub struct MockCurrencyRepository {
    currencies: Arc<Mutex<Vec<Currency>>>,
}

impl MockCurrencyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currencies(currencies: Vec<Currency>) -> Self {
        Self {
            currencies: Arc::new(Mutex::new(currencies)),
        }
    }
}

#[async_trait]
impl CurrencyRepositoryTrait for MockCurrencyRepository {
    fn count_currencies(&self) -> Result<i64> {
        Ok(self.currencies.lock().unwrap().len() as i64)
    }

    fn list_currencies(&self) -> Result<Vec<Currency>> {
        Ok(self.currencies.lock().unwrap().clone())
    }

    fn get_currency(&self, id: i32) -> Result<Option<Currency>> {
        Ok(self
            .currencies
            .lock()
            .unwrap()
            .iter()
            .find(|currency| currency.id == id)
            .cloned())
    }

    fn get_currency_by_code(&self, code: &str) -> Result<Option<Currency>> {
        Ok(self
            .currencies
            .lock()
            .unwrap()
            .iter()
            .find(|currency| currency.code == code)
            .cloned())
    }

    async fn insert_currencies(&self, currencies: Vec<Currency>) -> Result<usize> {
        let mut stored = self.currencies.lock().unwrap();
        for currency in &currencies {
            if stored.iter().any(|existing| existing.id == currency.id) {
                return Err(DatabaseError::UniqueViolation(format!("currency {}", currency.id)).into());
            }
        }
        let count = currencies.len();
        stored.extend(currencies);
        Ok(count)
    }
}

// =========================================================================
// Mock RateRepository
// =========================================================================

#[derive(Clone, Default)]
pub struct MockRateRepository {
    rates: Arc<Mutex<BTreeMap<(i32, NaiveDate), f64>>>,
}

impl MockRateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rates(observations: Vec<RateObservation>) -> Self {
        let repository = Self::new();
        {
            let mut rates = repository.rates.lock().unwrap();
            for observation in observations {
                rates.insert((observation.currency_id, observation.date), observation.value);
            }
        }
        repository
    }

    pub fn value(&self, currency_id: i32, date: NaiveDate) -> Option<f64> {
        self.rates.lock().unwrap().get(&(currency_id, date)).copied()
    }

    pub fn dates_of(&self, currency_id: i32) -> Vec<NaiveDate> {
        self.rates
            .lock()
            .unwrap()
            .keys()
            .filter(|(id, _)| *id == currency_id)
            .map(|(_, date)| *date)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.rates.lock().unwrap().len()
    }

    /// Every stored `(currency_id, date, value)`, ordered by currency then date.
    pub fn rows(&self) -> Vec<(i32, NaiveDate, f64)> {
        self.rates
            .lock()
            .unwrap()
            .iter()
            .map(|((id, date), value)| (*id, *date, *value))
            .collect()
    }
}

#[async_trait]
impl RateRepositoryTrait for MockRateRepository {
    fn latest_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self.rates.lock().unwrap().keys().map(|(_, date)| *date).max())
    }

    fn latest_dates_by_currency(&self) -> Result<HashMap<i32, NaiveDate>> {
        let mut latest = HashMap::new();
        for (currency_id, date) in self.rates.lock().unwrap().keys() {
            let entry = latest.entry(*currency_id).or_insert(*date);
            if *date > *entry {
                *entry = *date;
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
        Ok(self
            .rates
            .lock()
            .unwrap()
            .iter()
            .filter(|((id, date), _)| *id == currency_id && from <= *date && *date <= to)
            .map(|((id, date), value)| observation(*id, *date, *value))
            .collect())
    }

    async fn insert_rates(
        &self,
        observations: Vec<RateObservation>,
        on_conflict: OnConflict,
    ) -> Result<usize> {
        let mut rates = self.rates.lock().unwrap();
        let mut inserted = 0;
        let mut conflicts = Vec::new();
        for observation in observations {
            let key = (observation.currency_id, observation.date);
            if rates.contains_key(&key) {
                conflicts.push(RateConflict {
                    currency_id: observation.currency_id,
                    date: observation.date,
                    value: observation.value,
                });
                continue;
            }
            rates.insert(key, observation.value);
            inserted += 1;
        }
        if on_conflict == OnConflict::Fail && !conflicts.is_empty() {
            return Err(Error::RateConflicts(RateConflicts(conflicts)));
        }
        Ok(inserted)
    }
}

// =========================================================================
// Scripted rate source
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Day(NaiveDate),
    Period {
        url_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    },
    Directory,
}

/// Serves canned pages. Missing day snapshots answer 404; history windows
/// without rows answer with an empty table.
#[derive(Default)]
pub struct ScriptedProvider {
    days: HashMap<NaiveDate, Vec<DayRate>>,
    histories: HashMap<i32, Vec<PeriodRate>>,
    stray: HashMap<i32, PeriodRate>,
    directory: Vec<DirectoryEntry>,
    requests: Mutex<Vec<Request>>,
    gate: Option<Arc<Notify>>,
    gate_opened: AtomicBool,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(mut self, entries: Vec<DirectoryEntry>) -> Self {
        self.directory = entries;
        self
    }

    pub fn with_day(mut self, day: NaiveDate, rates: Vec<DayRate>) -> Self {
        self.days.insert(day, rates);
        self
    }

    pub fn with_history(mut self, url_id: i32, rates: Vec<PeriodRate>) -> Self {
        self.histories.entry(url_id).or_default().extend(rates);
        self
    }

    /// Makes every history answer for `url_id` carry `rate`, whatever the window.
    pub fn with_stray_rate(mut self, url_id: i32, rate: PeriodRate) -> Self {
        self.stray.insert(url_id, rate);
        self
    }

    /// Holds the first request until `gate` is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn period_requests(&self) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|request| matches!(request, Request::Period { .. }))
            .collect()
    }

    async fn record(&self, request: Request) {
        self.requests.lock().unwrap().push(request);
        if let Some(gate) = &self.gate {
            if !self.gate_opened.swap(true, Ordering::SeqCst) {
                gate.notified().await;
            }
        }
    }
}

#[async_trait]
impl RatesProvider for ScriptedProvider {
    async fn day_rates(&self, date: NaiveDate) -> std::result::Result<Vec<DayRate>, MarketDataError> {
        self.record(Request::Day(date)).await;
        self.days
            .get(&date)
            .cloned()
            .ok_or_else(|| MarketDataError::HttpStatus {
                url: format!("day/{date}"),
                status: 404,
            })
    }

    async fn period_rates(
        &self,
        url_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> std::result::Result<Vec<PeriodRate>, MarketDataError> {
        self.record(Request::Period { url_id, from, to }).await;
        let mut rates: Vec<PeriodRate> = self
            .histories
            .get(&url_id)
            .map(|history| {
                history
                    .iter()
                    .filter(|rate| from <= rate.date && rate.date <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if let Some(stray) = self.stray.get(&url_id) {
            rates.push(stray.clone());
        }
        if rates.is_empty() {
            return Err(MarketDataError::EmptyTable { page: "period" });
        }
        Ok(rates)
    }

    async fn directory(&self) -> std::result::Result<Vec<DirectoryEntry>, MarketDataError> {
        self.record(Request::Directory).await;
        if self.directory.is_empty() {
            return Err(MarketDataError::EmptyTable { page: "directory" });
        }
        Ok(self.directory.clone())
    }
}

/// Hands out the same [`ScriptedProvider`] for every session.
pub struct ScriptedSessions {
    provider: Arc<ScriptedProvider>,
    opened: AtomicUsize,
}

impl ScriptedSessions {
    pub fn new(provider: Arc<ScriptedProvider>) -> Self {
        Self {
            provider,
            opened: AtomicUsize::new(0),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl RatesSessionFactory for ScriptedSessions {
    fn open_session(&self) -> std::result::Result<Arc<dyn RatesProvider>, MarketDataError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(self.provider.clone())
    }
}
