//! URL templates for finmarket.ru.

use chrono::{Datelike, NaiveDate};

/// Production host.
pub const DEFAULT_BASE_URL: &str = "https://www.finmarket.ru";

/// All currencies quoted on one day.
const DAY_TEMPLATE: &str = "{base}/currency/rates/?id=10148&bd={day}&bm={month}&by={year}";

/// One currency over a date range, both ends inclusive.
const PERIOD_TEMPLATE: &str = "{base}/currency/rates/?id=10148&pv=1&cur={number}\
&bd={fromDay}&bm={fromMonth}&by={fromYear}&ed={toDay}&em={toMonth}&ey={toYear}";

/// Banknote directory listing every currency the site knows about.
const DIRECTORY_TEMPLATE: &str = "{base}/currency/banknotes/";

/// Builds page URLs against a base host.
#[derive(Clone, Debug)]
pub struct FinmarketUrls {
    base: String,
}

impl FinmarketUrls {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn day(&self, date: NaiveDate) -> String {
        fill(
            DAY_TEMPLATE,
            &[
                ("base", self.base.clone()),
                ("day", date.day().to_string()),
                ("month", date.month().to_string()),
                ("year", date.year().to_string()),
            ],
        )
    }

    pub fn period(&self, url_id: i32, from: NaiveDate, to: NaiveDate) -> String {
        fill(
            PERIOD_TEMPLATE,
            &[
                ("base", self.base.clone()),
                ("number", url_id.to_string()),
                ("fromDay", from.day().to_string()),
                ("fromMonth", from.month().to_string()),
                ("fromYear", from.year().to_string()),
                ("toDay", to.day().to_string()),
                ("toMonth", to.month().to_string()),
                ("toYear", to.year().to_string()),
            ],
        )
    }

    pub fn directory(&self) -> String {
        fill(DIRECTORY_TEMPLATE, &[("base", self.base.clone())])
    }
}

impl Default for FinmarketUrls {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Substitute `{name}` placeholders. Unknown placeholders are left in place
/// and rejected later by the fetcher.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |url, (name, value)| {
            url.replace(&format!("{{{}}}", name), value)
        })
}
