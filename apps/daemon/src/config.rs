use std::time::Duration;

use chrono::NaiveDate;
use finrates_core::constants::DEFAULT_MAX_CONCURRENCY;
use finrates_core::{Error, Result};
use finrates_market_data::provider::finmarket::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub base_url: String,
    pub request_delay: Duration,
    pub max_concurrency: usize,
    pub force_day_update: bool,
    pub target_date: Option<NaiveDate>,
    pub sync_interval: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads `.env` when present, then reads the `FINRATES_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = var("FINRATES_DB_PATH").unwrap_or_else(|| "./data/finrates.db".into());
        let base_url = var("FINRATES_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let delay_ms: u64 = parse_or("FINRATES_REQUEST_DELAY_MS", var("FINRATES_REQUEST_DELAY_MS"), 1000)?;
        let max_concurrency: usize = parse_or(
            "FINRATES_MAX_CONCURRENCY",
            var("FINRATES_MAX_CONCURRENCY"),
            DEFAULT_MAX_CONCURRENCY,
        )?;
        if max_concurrency == 0 {
            return Err(Error::InvalidConfigValue(
                "FINRATES_MAX_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        let force_day_update = match var("FINRATES_FORCE_DAY_UPDATE") {
            Some(raw) => parse_bool("FINRATES_FORCE_DAY_UPDATE", &raw)?,
            None => false,
        };
        let target_date = var("FINRATES_TARGET_DATE")
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                    Error::InvalidConfigValue(format!(
                        "FINRATES_TARGET_DATE must be YYYY-MM-DD, got '{}'",
                        raw
                    ))
                })
            })
            .transpose()?;
        let interval_hours: u64 =
            parse_or("FINRATES_SYNC_INTERVAL_HOURS", var("FINRATES_SYNC_INTERVAL_HOURS"), 24)?;
        if interval_hours == 0 {
            return Err(Error::InvalidConfigValue(
                "FINRATES_SYNC_INTERVAL_HOURS must be at least 1".to_string(),
            ));
        }
        let log_format = match var("FINRATES_LOG_FORMAT") {
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) if raw.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(raw) => {
                return Err(Error::InvalidConfigValue(format!(
                    "FINRATES_LOG_FORMAT must be text or json, got '{}'",
                    raw
                )))
            }
            None => LogFormat::Text,
        };

        Ok(Self {
            db_path,
            base_url,
            request_delay: Duration::from_millis(delay_ms),
            max_concurrency,
            force_day_update,
            target_date,
            sync_interval: Duration::from_secs(interval_hours * 60 * 60),
            log_format,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(raw) => raw.parse().map_err(|_| {
            Error::InvalidConfigValue(format!("{} has an invalid value '{}'", key, raw))
        }),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidConfigValue(format!(
            "{} must be a boolean, got '{}'",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.db_path, "./data/finrates.db");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_delay, Duration::from_secs(1));
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert!(!config.force_day_update);
        assert_eq!(config.target_date, None);
        assert_eq!(config.sync_interval, Duration::from_secs(24 * 60 * 60));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("FINRATES_DB_PATH", "/var/lib/finrates/rates.db"),
            ("FINRATES_REQUEST_DELAY_MS", "250"),
            ("FINRATES_MAX_CONCURRENCY", "8"),
            ("FINRATES_FORCE_DAY_UPDATE", "true"),
            ("FINRATES_TARGET_DATE", "2024-01-12"),
            ("FINRATES_SYNC_INTERVAL_HOURS", "6"),
            ("FINRATES_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.db_path, "/var/lib/finrates/rates.db");
        assert_eq!(config.request_delay, Duration::from_millis(250));
        assert_eq!(config.max_concurrency, 8);
        assert!(config.force_day_update);
        assert_eq!(config.target_date, NaiveDate::from_ymd_opt(2024, 1, 12));
        assert_eq!(config.sync_interval, Duration::from_secs(6 * 60 * 60));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        for vars in [
            [("FINRATES_REQUEST_DELAY_MS", "-5")],
            [("FINRATES_MAX_CONCURRENCY", "0")],
            [("FINRATES_FORCE_DAY_UPDATE", "maybe")],
            [("FINRATES_TARGET_DATE", "12.01.2024")],
            [("FINRATES_SYNC_INTERVAL_HOURS", "0")],
            [("FINRATES_LOG_FORMAT", "xml")],
        ] {
            assert!(
                matches!(config(&vars), Err(Error::InvalidConfigValue(_))),
                "{:?} should be rejected",
                vars
            );
        }
    }
}
