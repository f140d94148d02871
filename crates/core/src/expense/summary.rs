//! Read models derived from the expense record.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::month::Month;
use super::record::{ExpenseDetail, ExpenseRecord, YearEntry};
use crate::ledger::Balances;

/// One named chart series of twelve monthly amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseSeries {
    /// Series label.
    pub name: String,
    /// Amounts Jan..Dec.
    pub data: Vec<Decimal>,
}

impl ExpenseSeries {
    fn for_year(name: &str, year: Option<&YearEntry>) -> Self {
        let data = match year {
            Some(entry) => entry.months.iter().map(|(_, m)| m.amount).collect(),
            None => vec![Decimal::ZERO; 12],
        };
        Self {
            name: name.to_string(),
            data,
        }
    }
}

/// Dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// USD total.
    pub total_amount_usd: Decimal,
    /// PKR total.
    pub total_amount_pkr: Decimal,
    /// Expenses recorded in the current month.
    pub current_month_total_expenses: Decimal,
    /// "This year" and "Last year" series.
    pub expense_history: Vec<ExpenseSeries>,
    /// Sum of the periodic amounts currently committed to beneficiaries.
    pub sum_expense: Decimal,
}

impl DashboardSummary {
    /// Builds the summary for `today`.
    #[must_use]
    pub fn build(
        balances: Balances,
        record: &ExpenseRecord,
        sum_expense: Decimal,
        today: NaiveDate,
    ) -> Self {
        let year = today.year();
        Self {
            total_amount_usd: balances.usd,
            total_amount_pkr: balances.pkr,
            current_month_total_expenses: record.month_total(year, Month::from_date(&today)),
            expense_history: vec![
                ExpenseSeries::for_year("This year", record.year(year)),
                ExpenseSeries::for_year("Last year", record.year(year - 1)),
            ],
            sum_expense,
        }
    }
}

/// One month's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthAmount {
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: Month,
    /// Month total.
    pub amount: Decimal,
}

/// Flat list of every stored year's twelve month totals, oldest year first.
#[must_use]
pub fn expenses_summary(record: &ExpenseRecord) -> Vec<MonthAmount> {
    let mut years: Vec<&YearEntry> = record.years.iter().collect();
    years.sort_by_key(|y| y.year);
    years
        .into_iter()
        .flat_map(|y| {
            y.months.iter().map(move |(month, entry)| MonthAmount {
                year: y.year,
                month,
                amount: entry.amount,
            })
        })
        .collect()
}

/// A single month with its detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthHistory {
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: Month,
    /// Month total.
    pub amount: Decimal,
    /// Detail lines.
    pub details: Vec<ExpenseDetail>,
}

/// Detail view of one month; `None` when the year was never recorded.
#[must_use]
pub fn month_history(record: &ExpenseRecord, year: i32, month: Month) -> Option<MonthHistory> {
    let entry = record.year(year)?.months.get(month);
    Some(MonthHistory {
        year,
        month,
        amount: entry.amount,
        details: entry.details.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn record() -> ExpenseRecord {
        let at = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
        let mut record = ExpenseRecord::new();
        record.add_expense_entry(2024, Month::Aug, dec!(800), "a", at).unwrap();
        record.add_expense_entry(2024, Month::Jan, dec!(100), "b", at).unwrap();
        record.add_expense_entry(2023, Month::Dec, dec!(50), "c", at).unwrap();
        record
    }

    #[test]
    fn test_dashboard_summary() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 20).unwrap();
        let summary = DashboardSummary::build(
            Balances::new(dec!(10000), dec!(20)),
            &record(),
            dec!(3000),
            today,
        );

        assert_eq!(summary.total_amount_pkr, dec!(10000));
        assert_eq!(summary.total_amount_usd, dec!(20));
        assert_eq!(summary.current_month_total_expenses, dec!(800));
        assert_eq!(summary.sum_expense, dec!(3000));

        let this_year = &summary.expense_history[0];
        assert_eq!(this_year.name, "This year");
        assert_eq!(this_year.data.len(), 12);
        assert_eq!(this_year.data[0], dec!(100));
        assert_eq!(this_year.data[7], dec!(800));

        let last_year = &summary.expense_history[1];
        assert_eq!(last_year.name, "Last year");
        assert_eq!(last_year.data[11], dec!(50));
    }

    #[test]
    fn test_summary_pads_missing_years() {
        let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let summary =
            DashboardSummary::build(Balances::default(), &record(), Decimal::ZERO, today);
        assert_eq!(summary.current_month_total_expenses, Decimal::ZERO);
        assert!(summary.expense_history.iter().all(|s| s.data == vec![Decimal::ZERO; 12]));
    }

    #[test]
    fn test_expenses_summary_is_flat_and_ordered() {
        let flat = expenses_summary(&record());
        assert_eq!(flat.len(), 24);
        assert_eq!(flat[0].year, 2023);
        assert_eq!(flat[0].month, Month::Jan);
        assert_eq!(flat[11].amount, dec!(50));
        assert_eq!(flat[12].year, 2024);
        assert_eq!(flat[19].month, Month::Aug);
        assert_eq!(flat[19].amount, dec!(800));
    }

    #[test]
    fn test_month_history() {
        let history = month_history(&record(), 2024, Month::Aug).unwrap();
        assert_eq!(history.amount, dec!(800));
        assert_eq!(history.details.len(), 1);

        let empty = month_history(&record(), 2024, Month::Mar).unwrap();
        assert_eq!(empty.amount, Decimal::ZERO);
        assert!(empty.details.is_empty());

        assert!(month_history(&record(), 1999, Month::Aug).is_none());
    }
}
