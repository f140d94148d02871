//! The expense record and its fixed twelve-month container.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::month::Month;
use crate::FinanceError;
use crate::ledger::ExpenseLine;

/// One expense detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDetail {
    /// When the expense was recorded.
    pub date: DateTime<Utc>,
    /// Signed amount.
    pub amount: Decimal,
    /// Free-text description.
    pub details: String,
}

/// Running total and detail lines of one month.
///
/// `amount` always equals the sum of `details[].amount`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthEntry {
    /// Running sum.
    pub amount: Decimal,
    /// Detail lines in insertion order.
    pub details: Vec<ExpenseDetail>,
}

impl MonthEntry {
    /// Appends a detail and adds its amount to the running sum.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the running sum would overflow. The entry is
    /// left untouched.
    pub fn push(&mut self, detail: ExpenseDetail) -> Result<(), FinanceError> {
        self.amount = self
            .amount
            .checked_add(detail.amount)
            .ok_or_else(FinanceError::amount_out_of_range)?;
        self.details.push(detail);
        Ok(())
    }
}

/// Exactly twelve month entries, all present from creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Months([MonthEntry; 12]);

impl Months {
    /// Entry for `month`.
    #[must_use]
    pub fn get(&self, month: Month) -> &MonthEntry {
        &self.0[month.index()]
    }

    /// Mutable entry for `month`.
    pub fn get_mut(&mut self, month: Month) -> &mut MonthEntry {
        &mut self.0[month.index()]
    }

    /// Months in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (Month, &MonthEntry)> {
        Month::ALL.into_iter().zip(self.0.iter())
    }
}

impl Serialize for Months {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(12))?;
        for (month, entry) in self.iter() {
            map.serialize_entry(month.short_name(), entry)?;
        }
        map.end()
    }
}

/// All months of one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearEntry {
    /// Calendar year.
    pub year: i32,
    /// The twelve months.
    pub months: Months,
}

impl YearEntry {
    /// A year with all months at zero.
    #[must_use]
    pub fn new(year: i32) -> Self {
        Self {
            year,
            months: Months::default(),
        }
    }

    /// Sum over all months, saturating at the decimal range.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.months
            .iter()
            .map(|(_, entry)| entry.amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

/// Expense breakdown across years, at most one entry per year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpenseRecord {
    /// Years in the order they were first touched.
    pub years: Vec<YearEntry>,
}

impl ExpenseRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an expense detail to `year`/`month`, creating the year if needed.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the month total would overflow.
    pub fn add_expense_entry(
        &mut self,
        year: i32,
        month: Month,
        amount: Decimal,
        details: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Result<&MonthEntry, FinanceError> {
        let entry = self.year_mut(year).months.get_mut(month);
        entry.push(ExpenseDetail {
            date,
            amount,
            details: details.into(),
        })?;
        Ok(entry)
    }

    /// Applies an expense line from a posting.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the month total would overflow.
    pub fn apply(&mut self, line: &ExpenseLine) -> Result<&MonthEntry, FinanceError> {
        self.add_expense_entry(
            line.year,
            line.month,
            line.amount,
            line.details.clone(),
            line.date,
        )
    }

    /// Entry for `year`, if any expense was ever recorded in it.
    #[must_use]
    pub fn year(&self, year: i32) -> Option<&YearEntry> {
        self.years.iter().find(|y| y.year == year)
    }

    /// Month total, zero when the year does not exist.
    #[must_use]
    pub fn month_total(&self, year: i32, month: Month) -> Decimal {
        self.year(year)
            .map_or(Decimal::ZERO, |y| y.months.get(month).amount)
    }

    fn year_mut(&mut self, year: i32) -> &mut YearEntry {
        let idx = match self.years.iter().position(|y| y.year == year) {
            Some(idx) => idx,
            None => {
                self.years.push(YearEntry::new(year));
                self.years.len() - 1
            }
        };
        &mut self.years[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_same_month_accumulates() {
        let mut record = ExpenseRecord::new();
        record.add_expense_entry(2024, Month::Aug, dec!(500), "rent", at()).unwrap();
        record.add_expense_entry(2024, Month::Aug, dec!(300), "food", at()).unwrap();

        assert_eq!(record.years.len(), 1);
        let aug = record.year(2024).unwrap().months.get(Month::Aug);
        assert_eq!(aug.amount, dec!(800));
        assert_eq!(aug.details.len(), 2);
        assert_eq!(aug.details[0].details, "rent");
        assert_eq!(aug.details[1].details, "food");
    }

    #[test]
    fn test_new_year_has_all_months_zeroed() {
        let mut record = ExpenseRecord::new();
        record.add_expense_entry(2023, Month::Mar, dec!(10), "x", at()).unwrap();

        let year = record.year(2023).unwrap();
        assert_eq!(year.months.iter().count(), 12);
        for (month, entry) in year.months.iter() {
            if month == Month::Mar {
                assert_eq!(entry.amount, dec!(10));
            } else {
                assert_eq!(entry.amount, Decimal::ZERO);
                assert!(entry.details.is_empty());
            }
        }
    }

    #[test]
    fn test_correction_reduces_total() {
        let mut record = ExpenseRecord::new();
        record.add_expense_entry(2024, Month::Aug, dec!(1000), "paid", at()).unwrap();
        record.add_expense_entry(2024, Month::Aug, dec!(-250), "returned", at()).unwrap();
        assert_eq!(record.month_total(2024, Month::Aug), dec!(750));
        assert_eq!(record.month_total(1999, Month::Aug), Decimal::ZERO);
    }

    #[test]
    fn test_months_serialize_in_calendar_order() {
        let mut record = ExpenseRecord::new();
        record.add_expense_entry(2024, Month::Feb, dec!(5), "x", at()).unwrap();

        let json = serde_json::to_value(&record).unwrap();
        let months = json["years"][0]["months"].as_object().unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months["Feb"]["amount"], serde_json::json!("5"));

        let text = serde_json::to_string(&record.years[0].months).unwrap();
        let jan = text.find("\"Jan\"").unwrap();
        let dec_pos = text.find("\"Dec\"").unwrap();
        assert!(jan < dec_pos);
    }

    #[test]
    fn test_month_overflow_is_rejected() {
        let mut record = ExpenseRecord::new();
        record
            .add_expense_entry(2024, Month::Aug, Decimal::MAX, "max", at())
            .unwrap();

        let err = record
            .add_expense_entry(2024, Month::Aug, dec!(1), "one more", at())
            .unwrap_err();

        assert!(matches!(err, FinanceError::Validation(_)));
        let aug = record.year(2024).unwrap().months.get(Month::Aug);
        assert_eq!(aug.amount, Decimal::MAX);
        assert_eq!(aug.details.len(), 1);
    }
}
