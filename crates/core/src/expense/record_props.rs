//! Property-based tests for the expense record.
//!
//! - Every month total equals the sum of its detail amounts
//! - At most one entry per year

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::month::Month;
use super::record::ExpenseRecord;

/// Strategy to generate signed amounts (-10,000.00 to 10,000.00).
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn month() -> impl Strategy<Value = Month> {
    (0usize..12).prop_map(|i| Month::ALL[i])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_month_total_equals_detail_sum(
        ops in prop::collection::vec((2020i32..2026, month(), signed_amount()), 0..60),
    ) {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut record = ExpenseRecord::new();
        for (year, month, amount) in &ops {
            record.add_expense_entry(*year, *month, *amount, "prop", at).unwrap();
        }

        for year in &record.years {
            for (month, entry) in year.months.iter() {
                let detail_sum: Decimal = entry.details.iter().map(|d| d.amount).sum();
                prop_assert_eq!(entry.amount, detail_sum);

                let expected: Decimal = ops
                    .iter()
                    .filter(|(y, m, _)| *y == year.year && *m == month)
                    .map(|(_, _, a)| *a)
                    .sum();
                prop_assert_eq!(entry.amount, expected);
            }
        }
    }

    #[test]
    fn prop_one_entry_per_year(
        years in prop::collection::vec(2000i32..2010, 0..50),
    ) {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut record = ExpenseRecord::new();
        for year in &years {
            record.add_expense_entry(*year, Month::Jan, Decimal::ONE, "prop", at).unwrap();
        }

        let mut seen: Vec<i32> = record.years.iter().map(|y| y.year).collect();
        let before = seen.len();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), before);
    }
}
