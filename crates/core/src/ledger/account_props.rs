//! Property-based tests for the ledger account.
//!
//! - Totals equal the initial totals plus the sum of applied amounts
//! - Every entry moves exactly its own currency by its own amount
//! - Replaying the log from zero reproduces the live totals

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use zakat_shared::types::Currency;

use super::account::Account;

/// Strategy to generate signed amounts (-100,000.00 to 100,000.00).
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a supported currency.
fn currency() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::Pkr), Just(Currency::Usd)]
}

fn run(ops: &[(Decimal, Currency)]) -> Account {
    let at = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
    let mut account = Account::new();
    for (amount, currency) in ops {
        account.log_transaction(*amount, *currency, "prop", "", at).unwrap();
    }
    account
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Final total per currency is the sum of that currency's amounts.
    #[test]
    fn prop_total_is_sum_of_amounts(
        ops in prop::collection::vec((signed_amount(), currency()), 0..40),
    ) {
        let account = run(&ops);

        for cur in Currency::ALL {
            let expected: Decimal = ops
                .iter()
                .filter(|(_, c)| *c == cur)
                .map(|(a, _)| *a)
                .sum();
            prop_assert_eq!(account.balances().get(cur), expected);
        }
    }

    /// Each entry changes its own currency by its amount and leaves the other.
    #[test]
    fn prop_entry_snapshot_deltas(
        ops in prop::collection::vec((signed_amount(), currency()), 1..40),
    ) {
        let account = run(&ops);

        for entry in &account.transaction_logs {
            for cur in Currency::ALL {
                let delta = entry.after().get(cur) - entry.before().get(cur);
                if cur == entry.currency {
                    prop_assert_eq!(delta, entry.amount);
                } else {
                    prop_assert_eq!(delta, Decimal::ZERO);
                }
            }
        }
    }

    /// Replay from zero reproduces the live totals and the chain is intact.
    #[test]
    fn prop_replay_matches_totals(
        ops in prop::collection::vec((signed_amount(), currency()), 0..40),
    ) {
        let account = run(&ops);
        prop_assert_eq!(account.replay().unwrap(), account.balances());
        prop_assert!(account.is_consistent());
        prop_assert_eq!(account.transaction_logs.len(), ops.len());
    }
}
