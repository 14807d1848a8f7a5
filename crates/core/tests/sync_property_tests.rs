//! Property-based integration tests for the sync planning helpers.
//!
//! These tests check the planning rules over random catalogs and watermarks,
//! using the `proptest` crate for random test case generation.

use chrono::{Duration, NaiveDate};
use finrates_core::constants::{epoch_floor, MAX_WINDOW_DAYS};
use finrates_core::currencies::Currency;
use finrates_core::rates::Watermarks;
use finrates_core::sync::{partition, plan_backfills, select_strategy, windows, UpdateStrategy};
use proptest::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Generators
// =============================================================================

fn arb_day() -> impl Strategy<Value = NaiveDate> {
    (0i64..12_000).prop_map(|offset| epoch_floor() + Duration::days(offset))
}

/// A catalog of up to 40 currencies, each with an optional watermark.
fn arb_store() -> impl Strategy<Value = (Vec<Currency>, HashMap<i32, NaiveDate>)> {
    prop::collection::vec(proptest::option::of(arb_day()), 1..40).prop_map(|marks| {
        let currencies = (0..marks.len() as i32)
            .map(|id| Currency {
                id,
                url_id: 10_000 + id,
                code: format!("C{id:02}"),
                name: String::new(),
                country: String::new(),
            })
            .collect();
        let per_currency = marks
            .into_iter()
            .enumerate()
            .filter_map(|(id, mark)| mark.map(|mark| (id as i32, mark)))
            .collect();
        (currencies, per_currency)
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn backfills_restore_the_global_watermark((currencies, per_currency) in arb_store()) {
        let global = per_currency.values().max().copied();
        let watermarks = Watermarks { global, per_currency };
        let plan = plan_backfills(&currencies, &watermarks);

        for currency in &currencies {
            let own = watermarks.of(currency.id);
            let lag = (watermarks.global() - own).num_days();
            let planned = plan.iter().find(|backfill| backfill.currency_id == currency.id);
            match planned {
                Some(backfill) => {
                    prop_assert!(lag > 1);
                    prop_assert_eq!(backfill.from, own + Duration::days(1));
                    prop_assert_eq!(backfill.to, watermarks.global());
                }
                None => prop_assert!(lag <= 1),
            }
        }
    }

    #[test]
    fn backfill_windows_fit_one_request_each((currencies, per_currency) in arb_store()) {
        let global = per_currency.values().max().copied();
        let watermarks = Watermarks { global, per_currency };

        for backfill in plan_backfills(&currencies, &watermarks) {
            let boundaries = partition(backfill.from, backfill.to).unwrap();
            let covered: i64 = windows(&boundaries)
                .iter()
                .map(|window| {
                    let span = (window.to - window.from).num_days();
                    assert!(span <= MAX_WINDOW_DAYS);
                    span + 1
                })
                .sum();
            prop_assert_eq!(covered, (backfill.to - backfill.from).num_days() + 1);
        }
    }

    #[test]
    fn strategy_follows_request_count(gap in 1i64..20_000, count in 1usize..200) {
        let expected = if gap > count as i64 {
            UpdateStrategy::Period
        } else {
            UpdateStrategy::Day
        };
        prop_assert_eq!(select_strategy(gap, count, false), expected);
        prop_assert_eq!(select_strategy(gap, count, true), UpdateStrategy::Day);
    }
}
