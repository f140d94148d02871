//! Calendar months keyed by their short English names.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::FinanceError;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    /// January
    Jan,
    /// February
    Feb,
    /// March
    Mar,
    /// April
    Apr,
    /// May
    May,
    /// June
    Jun,
    /// July
    Jul,
    /// August
    Aug,
    /// September
    Sep,
    /// October
    Oct,
    /// November
    Nov,
    /// December
    Dec,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Self; 12] = [
        Self::Jan,
        Self::Feb,
        Self::Mar,
        Self::Apr,
        Self::May,
        Self::Jun,
        Self::Jul,
        Self::Aug,
        Self::Sep,
        Self::Oct,
        Self::Nov,
        Self::Dec,
    ];

    /// 1-based month number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Zero-based position in the calendar.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Month from a 1-based number.
    #[must_use]
    pub fn from_number(number: u32) -> Option<Self> {
        let idx = usize::try_from(number).ok()?.checked_sub(1)?;
        Self::ALL.get(idx).copied()
    }

    /// Month a date falls in.
    #[must_use]
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        // Datelike::month is always 1..=12
        Self::ALL[date.month0() as usize]
    }

    /// Three-letter name, e.g. "Aug".
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Jan => "Jan",
            Self::Feb => "Feb",
            Self::Mar => "Mar",
            Self::Apr => "Apr",
            Self::May => "May",
            Self::Jun => "Jun",
            Self::Jul => "Jul",
            Self::Aug => "Aug",
            Self::Sep => "Sep",
            Self::Oct => "Oct",
            Self::Nov => "Nov",
            Self::Dec => "Dec",
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

impl std::str::FromStr for Month {
    type Err = FinanceError;

    /// Accepts short names in any case ("aug", "Aug").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.short_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FinanceError::NotFound(format!("month {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("Jan", Month::Jan)]
    #[case("aug", Month::Aug)]
    #[case("DEC", Month::Dec)]
    fn test_parse_short_name(#[case] raw: &str, #[case] expected: Month) {
        assert_eq!(Month::from_str(raw).unwrap(), expected);
    }

    #[test]
    fn test_unknown_month_is_not_found() {
        assert!(matches!(
            Month::from_str("August"),
            Err(FinanceError::NotFound(_))
        ));
    }

    #[test]
    fn test_numbering() {
        assert_eq!(Month::Jan.number(), 1);
        assert_eq!(Month::Dec.number(), 12);
        assert_eq!(Month::from_number(8), Some(Month::Aug));
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(13), None);
    }

    #[test]
    fn test_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Month::from_date(&date), Month::Feb);
    }
}
