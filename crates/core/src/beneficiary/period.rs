//! Billing periods used to deduplicate payments.
//!
//! Monthly terms are paid once per calendar month, Yearly terms once per
//! calendar year. The scheduler uses the term's anniversary month only to
//! decide when a Yearly payment fires; the period itself is the year.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::types::TermType;
use crate::expense::Month;

/// A calendar month or a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    /// Calendar year.
    pub year: i32,
    /// Month for monthly periods, `None` for a whole year.
    pub month: Option<Month>,
}

impl BillingPeriod {
    /// A single calendar month.
    #[must_use]
    pub const fn monthly(year: i32, month: Month) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }

    /// A whole calendar year.
    #[must_use]
    pub const fn yearly(year: i32) -> Self {
        Self { year, month: None }
    }

    /// The period a payment at `at` falls in for a term of `term_type`.
    ///
    /// `Occasionally` terms have no billing period.
    #[must_use]
    pub fn for_term(term_type: TermType, at: &DateTime<Utc>) -> Option<Self> {
        match term_type {
            TermType::Monthly => Some(Self::monthly(at.year(), Month::from_date(at))),
            TermType::Yearly => Some(Self::yearly(at.year())),
            TermType::Occasionally => None,
        }
    }

    /// Returns true if `date` falls inside the period.
    #[must_use]
    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        date.year() == self.year && self.month.is_none_or(|m| m == Month::from_date(date))
    }

    /// Stable key, `2024-08` or `2024`.
    #[must_use]
    pub fn key(&self) -> String {
        match self.month {
            Some(month) => format!("{}-{:02}", self.year, month.number()),
            None => self.year.to_string(),
        }
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_monthly_period() {
        let period = BillingPeriod::for_term(TermType::Monthly, &at(2024, 8, 15)).unwrap();
        assert_eq!(period, BillingPeriod::monthly(2024, Month::Aug));
        assert!(period.contains(&at(2024, 8, 1)));
        assert!(period.contains(&at(2024, 8, 31)));
        assert!(!period.contains(&at(2024, 9, 1)));
        assert!(!period.contains(&at(2023, 8, 15)));
        assert_eq!(period.key(), "2024-08");
    }

    #[test]
    fn test_yearly_period() {
        let period = BillingPeriod::for_term(TermType::Yearly, &at(2024, 3, 2)).unwrap();
        assert_eq!(period, BillingPeriod::yearly(2024));
        assert!(period.contains(&at(2024, 12, 31)));
        assert!(!period.contains(&at(2025, 1, 1)));
        assert_eq!(period.to_string(), "2024");
    }

    #[test]
    fn test_occasionally_has_no_period() {
        assert!(BillingPeriod::for_term(TermType::Occasionally, &at(2024, 1, 1)).is_none());
    }
}
