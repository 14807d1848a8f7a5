use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};
use finrates_core::sync::{SyncConfig, SyncDriver};
use finrates_market_data::{Finmarket, FinmarketConfig};
use finrates_storage_sqlite::{db, CurrencyRepository, RateRepository};

pub struct AppState {
    pub driver: Arc<SyncDriver>,
    pub currencies: Arc<CurrencyRepository>,
    pub rates: Arc<RateRepository>,
}

pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let currencies = Arc::new(CurrencyRepository::new(pool.clone(), writer.clone()));
    let rates = Arc::new(RateRepository::new(pool.clone(), writer));

    let finmarket = Arc::new(Finmarket::new(FinmarketConfig {
        base_url: config.base_url.clone(),
        request_delay: config.request_delay,
    }));
    tracing::info!(
        "Fetching from {} with a {:?} delay between requests",
        finmarket.urls().base(),
        config.request_delay
    );

    let driver = Arc::new(SyncDriver::new(
        currencies.clone(),
        rates.clone(),
        finmarket,
        SyncConfig {
            max_concurrency: config.max_concurrency,
            force_day_update: config.force_day_update,
            target_date: config.target_date,
        },
    ));

    Ok(Arc::new(AppState {
        driver,
        currencies,
        rates,
    }))
}
