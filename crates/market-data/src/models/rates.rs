use chrono::NaiveDate;

/// A row of the day snapshot table.
///
/// `rate` and `change` are already divided by `amount`, so they describe
/// one unit of the foreign currency.
#[derive(Clone, Debug, PartialEq)]
pub struct DayRate {
    /// 3-letter currency code
    pub code: String,
    /// Display name as printed on the page
    pub name: String,
    /// Number of units the site quotes the rate for
    pub amount: i64,
    /// Value of one unit in local currency
    pub rate: f64,
    /// Change since the previous quote, per unit
    pub change: f64,
}

/// A row of the period table for a single currency.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodRate {
    pub date: NaiveDate,
    pub amount: i64,
    /// Value of one unit in local currency
    pub rate: f64,
    pub change: f64,
}
