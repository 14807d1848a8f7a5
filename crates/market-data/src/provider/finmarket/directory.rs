//! Parser for the banknote directory page.
//!
//! Row layout: name (with a link carrying the site id) | code | number | country.
//! The first two rows of the table are headers.

use log::debug;
use scraper::{ElementRef, Html};

use super::html::{first_match, row_cells, selector, text_of};
use crate::errors::MarketDataError;
use crate::models::DirectoryEntry;

const PAGE: &str = "directory";
const CELLS_PER_ROW: usize = 4;
const HEADER_ROWS: usize = 2;

/// Parse the directory table.
///
/// Rows without an embedded link are not currencies and are skipped.
pub fn parse_directory_table(
    document: &Html,
) -> Result<impl Iterator<Item = Result<DirectoryEntry, MarketDataError>> + '_, MarketDataError> {
    let table = first_match(document, PAGE, "table")?;
    let tr = selector(PAGE, "tr")?;
    let rows: Vec<ElementRef<'_>> = table.select(&tr).collect();

    if rows.len() <= HEADER_ROWS {
        return Err(MarketDataError::EmptyTable { page: PAGE });
    }

    Ok(rows
        .into_iter()
        .skip(HEADER_ROWS)
        .filter_map(|row| parse_row(row).transpose()))
}

fn parse_row(row: ElementRef<'_>) -> Result<Option<DirectoryEntry>, MarketDataError> {
    let cells = row_cells(row, PAGE, CELLS_PER_ROW)?;

    let link = selector(PAGE, "a")?;
    let Some(anchor) = cells[0].select(&link).next() else {
        debug!("Skipping directory row without link: {}", text_of(row).trim());
        return Ok(None);
    };
    let href = anchor
        .value()
        .attr("href")
        .ok_or_else(|| MarketDataError::structure(PAGE, "link without href"))?;

    let url_id = href
        .split('=')
        .nth(1)
        .and_then(|value| value.trim().parse::<i32>().ok())
        .ok_or_else(|| MarketDataError::InvalidNumber {
            field: "url id",
            value: href.to_string(),
        })?;

    let number = text_of(cells[2]);
    let id = number
        .trim()
        .parse::<i32>()
        .map_err(|_| MarketDataError::InvalidNumber {
            field: "number",
            value: number.clone(),
        })?;

    Ok(Some(DirectoryEntry {
        id,
        url_id,
        code: text_of(cells[1]).trim().to_string(),
        name: normalize_name(&text_of(cells[0])),
        country: text_of(cells[3]).trim().to_string(),
    }))
}

/// Drop embedded line breaks and surrounding whitespace.
pub fn normalize_name(raw: &str) -> String {
    raw.replace(['\n', '\r'], "").trim().to_string()
}
