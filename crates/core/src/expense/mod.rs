//! Expense aggregate: year → month → amount and detail breakdown.

pub mod month;
pub mod record;
pub mod summary;

#[cfg(test)]
mod record_props;

pub use month::Month;
pub use record::{ExpenseDetail, ExpenseRecord, MonthEntry, Months, YearEntry};
pub use summary::{
    DashboardSummary, ExpenseSeries, MonthAmount, MonthHistory, expenses_summary, month_history,
};
