//! Parser for the period page: one currency over a date range.
//!
//! Row layout: date (dd.mm.yyyy) | amount | rate | change

use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use super::html::{child_elements, first_match, first_within, row_cells, text_of};
use super::numbers::{parse_amount, per_unit};
use crate::errors::MarketDataError;
use crate::models::PeriodRate;

const PAGE: &str = "period";
const CELLS_PER_ROW: usize = 4;

/// Parse the `table.karramba` history table of a period page.
pub fn parse_period_table(
    document: &Html,
) -> Result<impl Iterator<Item = Result<PeriodRate, MarketDataError>> + '_, MarketDataError> {
    let table = first_match(document, PAGE, "table.karramba")?;
    let tbody = first_within(table, PAGE, "tbody")?;

    let mut rows = child_elements(tbody, "tr").peekable();
    if rows.peek().is_none() {
        return Err(MarketDataError::EmptyTable { page: PAGE });
    }

    Ok(rows.map(parse_row))
}

fn parse_row(row: ElementRef<'_>) -> Result<PeriodRate, MarketDataError> {
    let cells = row_cells(row, PAGE, CELLS_PER_ROW)?;

    let date = parse_date(&text_of(cells[0]))?;
    let amount = parse_amount(&text_of(cells[1]))?;
    Ok(PeriodRate {
        date,
        amount,
        rate: per_unit("rate", &text_of(cells[2]), amount)?,
        change: per_unit("change", &text_of(cells[3]), amount)?,
    })
}

/// Parse a `day.month.year` cell.
fn parse_date(raw: &str) -> Result<NaiveDate, MarketDataError> {
    NaiveDate::parse_from_str(raw.trim(), "%d.%m.%Y")
        .map_err(|_| MarketDataError::InvalidDate(raw.to_string()))
}
