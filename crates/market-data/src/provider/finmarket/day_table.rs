//! Parser for the day snapshot page: every quoted currency on one date.
//!
//! Row layout: code | name | amount | rate | change

use scraper::{ElementRef, Html};

use super::html::{child_elements, row_cells, selector, text_of};
use super::numbers::{parse_amount, per_unit};
use crate::errors::MarketDataError;
use crate::models::DayRate;

const PAGE: &str = "day";
const CELLS_PER_ROW: usize = 5;

/// Parse the snapshot table of a day page.
///
/// The snapshot is the first `tbody` whose leading row has the five rate
/// cells. The HTML parser wraps bare `<tr>` rows of layout tables in an
/// implied `tbody`, so those are passed over. Rows are parsed lazily as the
/// iterator is consumed. A missing or empty table is an error.
pub fn parse_day_table(
    document: &Html,
) -> Result<impl Iterator<Item = Result<DayRate, MarketDataError>> + '_, MarketDataError> {
    let tbody_selector = selector(PAGE, "tbody")?;

    let mut found_tbody = false;
    let mut found_empty = false;
    let mut snapshot = None;
    for tbody in document.select(&tbody_selector) {
        found_tbody = true;
        match child_elements(tbody, "tr").next() {
            None => found_empty = true,
            Some(row) if child_elements(row, "td").count() == CELLS_PER_ROW => {
                snapshot = Some(tbody);
                break;
            }
            Some(_) => {}
        }
    }

    match snapshot {
        Some(tbody) => Ok(child_elements(tbody, "tr").map(parse_row)),
        None if found_empty => Err(MarketDataError::EmptyTable { page: PAGE }),
        None if found_tbody => Err(MarketDataError::structure(
            PAGE,
            format!("no table with {} cells per row", CELLS_PER_ROW),
        )),
        None => Err(MarketDataError::structure(PAGE, "'tbody' not found")),
    }
}

fn parse_row(row: ElementRef<'_>) -> Result<DayRate, MarketDataError> {
    let cells = row_cells(row, PAGE, CELLS_PER_ROW)?;

    let amount = parse_amount(&text_of(cells[2]))?;
    Ok(DayRate {
        code: text_of(cells[0]).trim().to_string(),
        name: text_of(cells[1]).trim().to_string(),
        amount,
        rate: per_unit("rate", &text_of(cells[3]), amount)?,
        change: per_unit("change", &text_of(cells[4]), amount)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"
        <html><body>
        <table class="fs11">
          <thead><tr><th>Код</th><th>Валюта</th><th>Кол-во</th><th>Курс</th><th>Изм.</th></tr></thead>
          <tbody>
            <tr><td>USD</td><td>Доллар США</td><td>1</td><td>89,6883</td><td>-0,2111</td></tr>
            <tr><td>JPY</td><td>Японских иен</td><td>100</td><td>62,3456</td><td>0,1000</td></tr>
            <tr><td>KZT</td><td>Казахстанских тенге</td><td>1&nbsp;000</td><td>1&nbsp;971,2000</td><td>2,0000</td></tr>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn test_parse_day_table_rows() {
        let document = Html::parse_document(SNAPSHOT);
        let rows: Vec<DayRate> = parse_day_table(&document)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].code, "USD");
        assert_eq!(rows[0].name, "Доллар США");
        assert_eq!(rows[0].amount, 1);
        assert!((rows[0].rate - 89.6883).abs() < 1e-9);
        assert!((rows[0].change + 0.2111).abs() < 1e-9);

        assert_eq!(rows[1].amount, 100);
        assert!((rows[1].rate - 0.623456).abs() < 1e-9);

        assert_eq!(rows[2].amount, 1000);
        assert!((rows[2].rate - 1.9712).abs() < 1e-9);
    }

    #[test]
    fn test_missing_tbody_is_structural() {
        let document = Html::parse_document("<html><body><p>maintenance</p></body></html>");
        assert!(matches!(
            parse_day_table(&document),
            Err(MarketDataError::Structure { page: "day", .. })
        ));
    }

    #[test]
    fn test_empty_table_is_structural() {
        let document =
            Html::parse_document("<table><tbody></tbody></table><p>nothing quoted</p>");
        assert!(matches!(
            parse_day_table(&document),
            Err(MarketDataError::EmptyTable { page: "day" })
        ));
    }

    #[test]
    fn test_layout_tables_before_snapshot_are_skipped() {
        let document = Html::parse_document(
            "<table><tr><td>Дата: 10.01.2024</td></tr></table>\
             <table><tr><td>Код</td><td>Курс</td></tr></table>\
             <table><tbody>\
             <tr><td>USD</td><td>Доллар США</td><td>1</td><td>89,6883</td><td>0,1</td></tr>\
             <tr><td>EUR</td><td>Евро</td><td>1</td><td>98,2530</td><td>-0,3</td></tr>\
             </tbody></table>",
        );
        let rows: Vec<DayRate> = parse_day_table(&document)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        let codes: Vec<&str> = rows.iter().map(|row| row.code.as_str()).collect();
        assert_eq!(codes, vec!["USD", "EUR"]);
    }

    #[test]
    fn test_no_five_cell_table_is_structural() {
        let document = Html::parse_document("<table><tr><td>Дата</td></tr></table>");
        assert!(matches!(
            parse_day_table(&document),
            Err(MarketDataError::Structure { page: "day", .. })
        ));
    }

    #[test]
    fn test_short_row_fails_lazily() {
        let document = Html::parse_document(
            "<table><tbody>\
             <tr><td>USD</td><td>Доллар США</td><td>1</td><td>89,6883</td><td>0</td></tr>\
             <tr><td>EUR</td><td>Евро</td></tr>\
             </tbody></table>",
        );
        let mut rows = parse_day_table(&document).unwrap();
        assert!(rows.next().unwrap().is_ok());
        assert!(matches!(
            rows.next().unwrap(),
            Err(MarketDataError::Structure { .. })
        ));
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_bad_rate_cell() {
        let document = Html::parse_document(
            "<table><tbody><tr><td>USD</td><td>Доллар</td><td>1</td><td>—</td><td>0</td></tr></tbody></table>",
        );
        let result: Result<Vec<DayRate>, _> = parse_day_table(&document).unwrap().collect();
        assert!(matches!(
            result,
            Err(MarketDataError::InvalidNumber { field: "rate", .. })
        ));
    }
}
