use chrono::NaiveDate;

/// Earliest date the rate site publishes history for, as (year, month, day).
/// Used as the watermark of an empty store.
pub const EPOCH_FLOOR: (i32, u32, u32) = (1992, 1, 1);

/// A day whose snapshot lists every currency worth tracking.
pub const REFERENCE_DAY: (i32, u32, u32) = (2024, 1, 1);

/// Width of one period request, in months.
pub const WINDOW_MONTHS: u32 = 24;

/// Longest span a single period request may cover, in days.
pub const MAX_WINDOW_DAYS: i64 = 731;

/// Default number of currencies fetched concurrently by the period strategy.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

pub fn epoch_floor() -> NaiveDate {
    ymd(EPOCH_FLOOR)
}

pub fn reference_day() -> NaiveDate {
    ymd(REFERENCE_DAY)
}

fn ymd((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
