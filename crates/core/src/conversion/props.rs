//! Property-based tests for conversions.
//!
//! - Receive credits exactly one currency by exactly the amount
//! - Convert moves `amount` out of the source and `amount × rate` into the target
//! - Same-currency conversions never produce a posting

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use zakat_shared::types::Currency;

use super::processor::{ConversionProcessor, converted_amount};
use super::types::{ConversionDetailsInput, ConversionKind, ConversionRequest};
use crate::FinanceError;

/// Strategy to generate positive decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 1000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn currency() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::Pkr), Just(Currency::Usd)]
}

const fn other(currency: Currency) -> Currency {
    match currency {
        Currency::Pkr => Currency::Usd,
        Currency::Usd => Currency::Pkr,
    }
}

fn request(
    amount: Decimal,
    currency: Currency,
    kind: ConversionKind,
    target: Currency,
    rate: Decimal,
) -> ConversionRequest {
    ConversionRequest {
        amount,
        currency: currency.code().to_string(),
        kind,
        depositor: "prop".into(),
        convert: Some(ConversionDetailsInput {
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            rate: Some(rate),
            currency: Some(target.code().to_string()),
        }),
        reason: "prop".into(),
    }
}

proptest! {
    #[test]
    fn prop_receive_credits_one_currency(
        amount in positive_amount(),
        cur in currency(),
        rate in positive_rate(),
    ) {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let (record, posting) = ConversionProcessor::prepare(
            request(amount, cur, ConversionKind::Receive, other(cur), rate),
            now,
        ).unwrap();

        prop_assert!(record.convert.is_none());
        prop_assert_eq!(posting.net(cur), amount);
        prop_assert_eq!(posting.net(other(cur)), Decimal::ZERO);
    }

    #[test]
    fn prop_convert_moves_amount_and_rate(
        amount in positive_amount(),
        cur in currency(),
        rate in positive_rate(),
    ) {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let (_, posting) = ConversionProcessor::prepare(
            request(amount, cur, ConversionKind::Convert, other(cur), rate),
            now,
        ).unwrap();

        prop_assert_eq!(posting.net(cur), -amount);
        let expected = converted_amount(amount, rate).unwrap();
        prop_assert_eq!(posting.net(other(cur)), expected);
        prop_assert!(expected.scale() <= 4);
    }

    #[test]
    fn prop_same_currency_rejected(
        amount in positive_amount(),
        cur in currency(),
        rate in positive_rate(),
    ) {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let result = ConversionProcessor::prepare(
            request(amount, cur, ConversionKind::Convert, cur, rate),
            now,
        );
        prop_assert!(matches!(result, Err(FinanceError::SameCurrency)));
    }
}
