//! Small helpers shared by the table parsers.

use scraper::{ElementRef, Html, Selector};

use crate::errors::MarketDataError;

/// Direct child elements of `parent` with the given tag name.
pub(super) fn child_elements<'a>(
    parent: ElementRef<'a>,
    tag: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |element| element.value().name() == tag)
}

/// First element in `document` matching `css`.
pub(super) fn first_match<'a>(
    document: &'a Html,
    page: &'static str,
    css: &'static str,
) -> Result<ElementRef<'a>, MarketDataError> {
    let selector = selector(page, css)?;
    let found = document.select(&selector).next();
    found.ok_or_else(|| MarketDataError::structure(page, format!("'{}' not found", css)))
}

/// First descendant of `parent` matching `css`.
pub(super) fn first_within<'a>(
    parent: ElementRef<'a>,
    page: &'static str,
    css: &'static str,
) -> Result<ElementRef<'a>, MarketDataError> {
    let selector = selector(page, css)?;
    let found = parent.select(&selector).next();
    found.ok_or_else(|| MarketDataError::structure(page, format!("'{}' not found", css)))
}

pub(super) fn selector(page: &'static str, css: &'static str) -> Result<Selector, MarketDataError> {
    Selector::parse(css)
        .map_err(|e| MarketDataError::structure(page, format!("bad selector '{}': {}", css, e)))
}

/// `<td>` cells of a row, exactly `expected` of them.
pub(super) fn row_cells<'a>(
    row: ElementRef<'a>,
    page: &'static str,
    expected: usize,
) -> Result<Vec<ElementRef<'a>>, MarketDataError> {
    let cells: Vec<ElementRef<'a>> = child_elements(row, "td").collect();
    if cells.len() != expected {
        return Err(MarketDataError::structure(
            page,
            format!("expected {} cells per row, found {}", expected, cells.len()),
        ));
    }
    Ok(cells)
}

/// Concatenated text content of an element.
pub(super) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
