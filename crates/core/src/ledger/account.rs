//! Account totals and the transaction log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zakat_shared::types::{Currency, LogEntryId, Money};

use super::posting::LedgerLine;
use crate::FinanceError;

/// Parses a currency code, failing with `UnsupportedCurrency` outside PKR/USD.
pub fn parse_currency(code: &str) -> Result<Currency, FinanceError> {
    code.parse::<Currency>()
        .map_err(|_| FinanceError::UnsupportedCurrency(code.to_string()))
}

/// Totals per currency at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    /// PKR total.
    pub pkr: Decimal,
    /// USD total.
    pub usd: Decimal,
}

impl Balances {
    /// Creates balances from both totals.
    #[must_use]
    pub const fn new(pkr: Decimal, usd: Decimal) -> Self {
        Self { pkr, usd }
    }

    /// Returns the total held in `currency`.
    #[must_use]
    pub const fn get(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Pkr => self.pkr,
            Currency::Usd => self.usd,
        }
    }

    /// Returns the balances after adding a signed amount to one currency.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the total would leave the decimal range.
    pub fn apply(self, money: Money) -> Result<Self, FinanceError> {
        let moved = |total: Decimal| {
            total
                .checked_add(money.amount)
                .ok_or_else(FinanceError::amount_out_of_range)
        };
        Ok(match money.currency {
            Currency::Pkr => Self::new(moved(self.pkr)?, self.usd),
            Currency::Usd => Self::new(self.pkr, moved(self.usd)?),
        })
    }
}

/// One immutable entry of the transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLogEntry {
    /// Entry identifier.
    pub id: LogEntryId,
    /// PKR total before the entry.
    pub amount_before_pkr: Decimal,
    /// USD total before the entry.
    pub amount_before_usd: Decimal,
    /// PKR total after the entry.
    pub amount_after_pkr: Decimal,
    /// USD total after the entry.
    pub amount_after_usd: Decimal,
    /// When the entry was appended.
    pub timestamp: DateTime<Utc>,
    /// Signed amount applied to `currency`.
    pub amount: Decimal,
    /// Currency the amount was applied to.
    pub currency: Currency,
    /// Short title, e.g. "Beneficiary Expense".
    pub title: String,
    /// Free-text description.
    pub details: String,
}

impl TransactionLogEntry {
    /// Builds the entry for `line` applied on top of `before`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the resulting total is out of range.
    pub fn record(
        before: Balances,
        line: &LedgerLine,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, FinanceError> {
        let after = before.apply(line.money())?;
        Ok(Self {
            id: LogEntryId::new(),
            amount_before_pkr: before.pkr,
            amount_before_usd: before.usd,
            amount_after_pkr: after.pkr,
            amount_after_usd: after.usd,
            timestamp,
            amount: line.amount,
            currency: line.currency,
            title: line.title.clone(),
            details: line.details.clone(),
        })
    }

    /// Builds the entry from the totals a delta update returned.
    ///
    /// Used by stores that apply the line atomically and only learn the
    /// resulting totals.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when either side of the entry is out of range.
    pub fn from_after(
        after: Balances,
        line: &LedgerLine,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, FinanceError> {
        let before = after.apply(line.money().negate())?;
        Self::record(before, line, timestamp)
    }

    /// Totals before the entry.
    #[must_use]
    pub const fn before(&self) -> Balances {
        Balances::new(self.amount_before_pkr, self.amount_before_usd)
    }

    /// Totals after the entry.
    #[must_use]
    pub const fn after(&self) -> Balances {
        Balances::new(self.amount_after_pkr, self.amount_after_usd)
    }
}

/// The charity's single ledger account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Running PKR total.
    pub total_amount_pkr: Decimal,
    /// Running USD total.
    pub total_amount_usd: Decimal,
    /// Log entries in insertion order.
    pub transaction_logs: Vec<TransactionLogEntry>,
}

impl Account {
    /// Creates an empty account with zero totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current totals.
    #[must_use]
    pub const fn balances(&self) -> Balances {
        Balances::new(self.total_amount_pkr, self.total_amount_usd)
    }

    /// Applies a signed amount to one currency and appends the log entry.
    ///
    /// No balance floor is enforced.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the total would overflow. The account is
    /// left untouched.
    pub fn log_transaction(
        &mut self,
        amount: Decimal,
        currency: Currency,
        title: impl Into<String>,
        details: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<&TransactionLogEntry, FinanceError> {
        let line = LedgerLine::new(Money::new(amount, currency), title, details);
        self.apply_line(&line, at)
    }

    /// Applies a ledger line and appends the log entry.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the total would overflow.
    pub fn apply_line(
        &mut self,
        line: &LedgerLine,
        at: DateTime<Utc>,
    ) -> Result<&TransactionLogEntry, FinanceError> {
        let entry = TransactionLogEntry::record(self.balances(), line, at)?;
        let after = entry.after();
        self.total_amount_pkr = after.pkr;
        self.total_amount_usd = after.usd;
        self.transaction_logs.push(entry);
        Ok(&self.transaction_logs[self.transaction_logs.len() - 1])
    }

    /// Replays the log from zero totals.
    ///
    /// For a consistent account this equals `balances()`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when an intermediate total overflows.
    pub fn replay(&self) -> Result<Balances, FinanceError> {
        self.transaction_logs
            .iter()
            .try_fold(Balances::default(), |acc, entry| {
                acc.apply(Money::new(entry.amount, entry.currency))
            })
    }

    /// Checks the log chains from zero totals to the live totals, each entry
    /// moving exactly its own amount.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut expected_before = Balances::default();
        for entry in &self.transaction_logs {
            let moved = entry.before().apply(Money::new(entry.amount, entry.currency));
            if entry.before() != expected_before || moved.ok() != Some(entry.after()) {
                return false;
            }
            expected_before = entry.after();
        }
        expected_before == self.balances()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_debit_from_zero_goes_negative() {
        let mut account = Account::new();
        let entry = account
            .log_transaction(dec!(-500), Currency::Pkr, "x", "y", at())
            .unwrap()
            .clone();

        assert_eq!(account.total_amount_pkr, dec!(-500));
        assert_eq!(account.total_amount_usd, dec!(0));
        assert_eq!(account.transaction_logs.len(), 1);
        assert_eq!(entry.amount_before_pkr, dec!(0));
        assert_eq!(entry.amount_after_pkr, dec!(-500));
        assert_eq!(entry.amount_before_usd, entry.amount_after_usd);
        assert_eq!(entry.title, "x");
        assert_eq!(entry.details, "y");
    }

    #[test]
    fn test_other_currency_snapshot_is_unchanged() {
        let mut account = Account::new();
        account
            .log_transaction(dec!(1000), Currency::Pkr, "Deposit", "", at())
            .unwrap();
        let entry = account
            .log_transaction(dec!(25.50), Currency::Usd, "Deposit", "", at())
            .unwrap()
            .clone();

        assert_eq!(entry.amount_before_pkr, dec!(1000));
        assert_eq!(entry.amount_after_pkr, dec!(1000));
        assert_eq!(entry.amount_before_usd, dec!(0));
        assert_eq!(entry.amount_after_usd, dec!(25.50));
        assert!(account.is_consistent());
    }

    #[test]
    fn test_from_after_matches_record() {
        let line = LedgerLine::new(Money::pkr(dec!(-300)), "t", "d");
        let before = Balances::new(dec!(1000), dec!(5));
        let after = before.apply(line.money()).unwrap();

        let recorded = TransactionLogEntry::record(before, &line, at()).unwrap();
        let derived = TransactionLogEntry::from_after(after, &line, at()).unwrap();

        assert_eq!(derived.before(), recorded.before());
        assert_eq!(derived.after(), recorded.after());
        assert_eq!(derived.after(), Balances::new(dec!(700), dec!(5)));
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("PKR").unwrap(), Currency::Pkr);
        assert_eq!(parse_currency("usd").unwrap(), Currency::Usd);
        assert!(matches!(
            parse_currency("EUR"),
            Err(FinanceError::UnsupportedCurrency(code)) if code == "EUR"
        ));
    }

    #[test]
    fn test_tampered_log_is_inconsistent() {
        let mut account = Account::new();
        account.log_transaction(dec!(100), Currency::Pkr, "a", "", at()).unwrap();
        account.log_transaction(dec!(-40), Currency::Pkr, "b", "", at()).unwrap();
        assert!(account.is_consistent());

        account.total_amount_pkr = dec!(1);
        assert!(!account.is_consistent());
    }

    #[test]
    fn test_overflowing_transaction_leaves_account_untouched() {
        let mut account = Account::new();
        account
            .log_transaction(Decimal::MAX, Currency::Usd, "Deposit", "", at())
            .unwrap();

        let err = account
            .log_transaction(dec!(1), Currency::Usd, "Deposit", "", at())
            .unwrap_err();

        assert!(matches!(err, FinanceError::Validation(ref msg) if msg == "amount out of range"));
        assert_eq!(account.total_amount_usd, Decimal::MAX);
        assert_eq!(account.transaction_logs.len(), 1);
        assert!(account.is_consistent());
    }
}
