use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// An incoming observation that collided with a stored one.
#[derive(Debug, Clone, PartialEq)]
pub struct RateConflict {
    pub currency_id: i32,
    pub date: NaiveDate,
    pub value: f64,
}

/// Every conflicting row of one batch insert.
///
/// Raised only after the non-conflicting rows of the batch were stored.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct RateConflicts(pub Vec<RateConflict>);

impl RateConflicts {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RateConflict> {
        self.0.iter()
    }
}

impl fmt::Display for RateConflicts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} observation(s) already stored", self.0.len())?;
        for (index, conflict) in self.0.iter().enumerate() {
            let separator = if index == 0 { ": " } else { ", " };
            write!(
                f,
                "{}currency {} on {} ({})",
                separator, conflict.currency_id, conflict.date, conflict.value
            )?;
        }
        Ok(())
    }
}
