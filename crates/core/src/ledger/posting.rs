//! Postings: everything one business event writes, applied as one unit.
//!
//! `Posting::expense` owns the sign convention between the ledger and the
//! expense aggregate: a positive expense debits the PKR total and adds the
//! same positive amount to the month it falls in.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zakat_shared::types::{BeneficiaryId, Currency, Money};

use crate::beneficiary::BillingPeriod;
use crate::expense::Month;

/// A signed amount applied to one currency total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Signed amount.
    pub amount: Decimal,
    /// Currency the amount applies to.
    pub currency: Currency,
    /// Log title.
    pub title: String,
    /// Log details.
    pub details: String,
}

impl LedgerLine {
    /// Creates a ledger line.
    pub fn new(money: Money, title: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            amount: money.amount,
            currency: money.currency,
            title: title.into(),
            details: details.into(),
        }
    }

    /// The signed amount with its currency.
    #[must_use]
    pub const fn money(&self) -> Money {
        Money::new(self.amount, self.currency)
    }
}

/// An addition to the expense aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLine {
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: Month,
    /// Signed amount added to the month total.
    pub amount: Decimal,
    /// Date recorded on the detail.
    pub date: DateTime<Utc>,
    /// Detail text.
    pub details: String,
}

/// Marks a term as paid for one billing period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStamp {
    /// Beneficiary paid.
    pub beneficiary_id: BeneficiaryId,
    /// 1-based term number.
    pub term_number: u32,
    /// Period the payment covers.
    pub period: BillingPeriod,
    /// Amount paid.
    pub amount: Decimal,
    /// When the payment was made.
    pub date: DateTime<Utc>,
}

/// The writes of one business event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// When the event happened. Every log entry it appends carries this.
    pub at: DateTime<Utc>,
    /// Ledger lines, applied in order.
    pub lines: Vec<LedgerLine>,
    /// Optional expense aggregate change.
    pub expense: Option<ExpenseLine>,
    /// Optional payment-history stamp.
    pub payment: Option<PaymentStamp>,
}

impl Posting {
    /// Records an expense of `amount` PKR dated `date`.
    ///
    /// The ledger is debited by `amount` and the expense month of `date`
    /// grows by `amount`. A negative amount is a correction: the ledger is
    /// credited and the month total shrinks.
    pub fn expense(
        amount: Decimal,
        title: impl Into<String>,
        details: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        let details = details.into();
        Self {
            at: date,
            lines: vec![LedgerLine::new(
                Money::pkr(-amount),
                title,
                details.clone(),
            )],
            expense: Some(ExpenseLine {
                year: date.year(),
                month: Month::from_date(&date),
                amount,
                date,
                details,
            }),
            payment: None,
        }
    }

    /// A single ledger line with no expense effect.
    pub fn single(
        money: Money,
        title: impl Into<String>,
        details: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            at,
            lines: vec![LedgerLine::new(money, title, details)],
            expense: None,
            payment: None,
        }
    }

    /// Two ledger lines applied together.
    #[must_use]
    pub fn pair(first: LedgerLine, second: LedgerLine, at: DateTime<Utc>) -> Self {
        Self {
            at,
            lines: vec![first, second],
            expense: None,
            payment: None,
        }
    }

    /// Overrides the log timestamp, keeping the expense date.
    #[must_use]
    pub fn recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.at = at;
        self
    }

    /// Attaches a payment stamp.
    #[must_use]
    pub fn with_payment(mut self, stamp: PaymentStamp) -> Self {
        self.payment = Some(stamp);
        self
    }

    /// Net ledger movement in `currency`.
    #[must_use]
    pub fn net(&self, currency: Currency) -> Decimal {
        self.lines
            .iter()
            .filter(|line| line.currency == currency)
            .map(|line| line.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expense_debits_ledger_and_credits_month() {
        let date = Utc.with_ymd_and_hms(2024, 8, 3, 9, 0, 0).unwrap();
        let posting = Posting::expense(dec!(1000), "Beneficiary Expense", "rent", date);

        assert_eq!(posting.lines.len(), 1);
        assert_eq!(posting.lines[0].amount, dec!(-1000));
        assert_eq!(posting.lines[0].currency, Currency::Pkr);
        assert_eq!(posting.net(Currency::Pkr), dec!(-1000));

        assert_eq!(posting.at, date);
        let expense = posting.expense.unwrap();
        assert_eq!(expense.year, 2024);
        assert_eq!(expense.month, Month::Aug);
        assert_eq!(expense.amount, dec!(1000));
        assert_eq!(expense.details, "rent");
    }

    #[test]
    fn test_negative_expense_is_a_correction() {
        let date = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 0).unwrap();
        let posting = Posting::expense(dec!(-200), "Amount Term Adjustment", "returned", date);

        assert_eq!(posting.net(Currency::Pkr), dec!(200));
        let expense = posting.expense.unwrap();
        assert_eq!(expense.month, Month::Jan);
        assert_eq!(expense.amount, dec!(-200));
    }

    #[test]
    fn test_pair_nets_per_currency() {
        let at = Utc.with_ymd_and_hms(2024, 8, 3, 9, 0, 0).unwrap();
        let posting = Posting::pair(
            LedgerLine::new(Money::new(dec!(-100), Currency::Usd), "Conversion", ""),
            LedgerLine::new(Money::pkr(dec!(27800)), "Conversion", ""),
            at,
        );
        assert_eq!(posting.net(Currency::Usd), dec!(-100));
        assert_eq!(posting.net(Currency::Pkr), dec!(27800));
        assert!(posting.expense.is_none());
        assert!(posting.payment.is_none());
    }
}
