//! Conversion validation and posting.
//!
//! CRITICAL: Rounding strategy for converted amounts:
//! - Round to 4 decimal places
//! - Use banker's rounding (round half to even)

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use zakat_shared::types::{ConversionId, Money};

use super::types::{
    ConversionDetails, ConversionDetailsInput, ConversionKind, ConversionRecord, ConversionRequest,
};
use crate::FinanceError;
use crate::ledger::{LedgerLine, Posting, parse_currency};
use crate::validation::{MAX_NAME_LEN, bounded_text, positive_amount, required_text};

/// Decimal places kept on converted amounts.
pub const CONVERTED_DECIMAL_PLACES: u32 = 4;

/// Converts an amount using the given rate.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
///
/// # Errors
///
/// Returns `Validation` when the product leaves the decimal range.
pub fn converted_amount(amount: Decimal, rate: Decimal) -> Result<Decimal, FinanceError> {
    amount
        .checked_mul(rate)
        .map(|product| {
            product.round_dp_with_strategy(
                CONVERTED_DECIMAL_PLACES,
                RoundingStrategy::MidpointNearestEven,
            )
        })
        .ok_or_else(FinanceError::amount_out_of_range)
}

/// Stateless conversion processor.
pub struct ConversionProcessor;

impl ConversionProcessor {
    /// Validates a request and builds the record and its ledger legs.
    ///
    /// `Receive` credits `amount` to its currency. `Convert` debits `amount`
    /// from the source and credits `amount × rate` to the target.
    ///
    /// # Errors
    ///
    /// - `Validation` for a non-positive amount or blank depositor/reason
    /// - `UnsupportedCurrency` for codes outside PKR/USD
    /// - `IncompleteConversionDetails` for a `Convert` missing date, rate or target
    /// - `SameCurrency` when source and target are the same
    pub fn prepare(
        request: ConversionRequest,
        now: DateTime<Utc>,
    ) -> Result<(ConversionRecord, Posting), FinanceError> {
        let amount = positive_amount(request.amount, "amount")?;
        let depositor = bounded_text(&request.depositor, "depositor", MAX_NAME_LEN)?;
        let reason = required_text(&request.reason, "reason")?;
        let currency = parse_currency(&request.currency)?;

        let (convert, posting) = match request.kind {
            ConversionKind::Receive => {
                let posting = Posting::single(
                    Money::new(amount, currency),
                    "Deposit",
                    format!("An amount of {amount} {currency} has been received from {depositor} due to the reason: {reason}"),
                    now,
                );
                (None, posting)
            }
            ConversionKind::Convert => {
                let details = validate_details(request.convert.unwrap_or_default())?;
                if details.currency == currency {
                    return Err(FinanceError::SameCurrency);
                }
                let target_amount = converted_amount(amount, details.rate)?;
                let text = format!(
                    "An amount of {amount} {currency} has been converted to {target_amount} {} at the rate of {} on {}",
                    details.currency, details.rate, details.date
                );
                let posting = Posting::pair(
                    LedgerLine::new(Money::new(-amount, currency), "Currency Conversion", text.clone()),
                    LedgerLine::new(
                        Money::new(target_amount, details.currency),
                        "Currency Conversion",
                        text,
                    ),
                    now,
                );
                (Some(details), posting)
            }
        };

        let record = ConversionRecord {
            id: ConversionId::new(),
            amount,
            date: now,
            currency,
            kind: request.kind,
            depositor,
            convert,
            reason,
        };
        Ok((record, posting))
    }
}

fn validate_details(input: ConversionDetailsInput) -> Result<ConversionDetails, FinanceError> {
    let (Some(date), Some(rate), Some(code)) = (input.date, input.rate, input.currency) else {
        return Err(FinanceError::IncompleteConversionDetails);
    };
    if rate <= Decimal::ZERO {
        return Err(FinanceError::IncompleteConversionDetails);
    }
    Ok(ConversionDetails {
        date,
        rate,
        currency: parse_currency(&code)?,
    })
}
