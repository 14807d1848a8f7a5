//! Numeric cell normalization.
//!
//! Cells use a decimal comma and non-breaking spaces as thousand separators,
//! e.g. `"1\u{a0}000"` or `"12,3456"`.

use crate::errors::MarketDataError;

const NBSP: char = '\u{a0}';

/// Parse the unit amount a rate is quoted for.
pub fn parse_amount(raw: &str) -> Result<i64, MarketDataError> {
    let cleaned: String = raw.chars().filter(|c| *c != NBSP).collect();
    match cleaned.trim().parse::<i64>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(MarketDataError::InvalidNumber {
            field: "amount",
            value: raw.to_string(),
        }),
    }
}

/// Parse a decimal-comma number.
pub fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, MarketDataError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != NBSP)
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .map_err(|_| MarketDataError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Parse a decimal-comma number quoted for `amount` units and return the
/// value of a single unit.
pub fn per_unit(field: &'static str, raw: &str, amount: i64) -> Result<f64, MarketDataError> {
    Ok(parse_decimal(field, raw)? / amount as f64)
}
