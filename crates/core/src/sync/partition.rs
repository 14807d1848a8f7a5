//! Splitting long date ranges into period requests the rate site accepts.

use chrono::{Months, NaiveDate};

use crate::constants::WINDOW_MONTHS;
use crate::errors::{Error, Result};

/// An inclusive date range covered by one period request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Returns strictly increasing boundaries from `from` to `to`.
///
/// Consecutive boundaries are at most two years apart. The result always has
/// at least two elements; `from == to` yields `[from, from]`.
pub fn partition(from: NaiveDate, to: NaiveDate) -> Result<Vec<NaiveDate>> {
    if to < from {
        return Err(Error::Invariant(format!(
            "Dates are misplaced: {} > {}",
            from, to
        )));
    }

    let mut boundaries = Vec::new();
    let mut current = from;
    loop {
        let next = current
            .checked_add_months(Months::new(WINDOW_MONTHS))
            .ok_or_else(|| Error::Invariant(format!("Date overflow after {}", current)))?;
        if next >= to {
            break;
        }
        boundaries.push(current);
        current = next;
    }
    boundaries.push(to);

    if boundaries.len() == 1 {
        boundaries.insert(0, from);
    }
    Ok(boundaries)
}

/// Turns boundaries into non-overlapping inclusive windows.
///
/// Every window but the last ends the day before the next boundary; the last
/// one ends on the final boundary.
pub fn windows(boundaries: &[NaiveDate]) -> Vec<DateWindow> {
    let last = boundaries.len().saturating_sub(2);
    boundaries
        .windows(2)
        .enumerate()
        .map(|(index, pair)| {
            let to = if index == last {
                pair[1]
            } else {
                pair[1].pred_opt().unwrap_or(pair[1])
            };
            DateWindow { from: pair[0], to }
        })
        .collect()
}
