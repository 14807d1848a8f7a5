use std::fmt;

/// How the forward update of a pass fetches rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStrategy {
    /// One history request per currency and window.
    Period,
    /// One snapshot request per day, covering every currency.
    Day,
}

impl fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateStrategy::Period => write!(f, "period"),
            UpdateStrategy::Day => write!(f, "day"),
        }
    }
}

/// Picks the strategy that needs fewer requests.
///
/// A gap of `gap_days` costs `gap_days` snapshot requests, or roughly one
/// history request per currency. Ties go to the day strategy.
pub fn select_strategy(gap_days: i64, currency_count: usize, force_day: bool) -> UpdateStrategy {
    let currency_count = i64::try_from(currency_count).unwrap_or(i64::MAX);
    if !force_day && gap_days > currency_count {
        UpdateStrategy::Period
    } else {
        UpdateStrategy::Day
    }
}
