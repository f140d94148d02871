//! Periodic disbursement.
//!
//! Manual `pay` and the monthly cycle share [`disburse`]. The payment stamp
//! it attaches is unique per (beneficiary, term, period), so whichever
//! trigger commits first wins and the other sees `AlreadyPaidThisPeriod`.

pub mod scheduler;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::FinanceError;
use crate::beneficiary::{Beneficiary, BillingPeriod, TermType};
use crate::expense::Month;
use crate::ledger::{PaymentStamp, Posting};

pub use scheduler::run_scheduler;

/// What initiated a disbursement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// An editor paid the beneficiary.
    Manual,
    /// The monthly cycle.
    Scheduled,
}

/// Builds the due-period payment of the beneficiary's current term.
///
/// # Errors
///
/// - `InvalidTermState` if the beneficiary is deceased, `current_term` is
///   out of range, the term is closed, the term is `Occasionally`, or its
///   periodic amount is not positive
/// - `AlreadyPaidThisPeriod` if the term already holds a payment in the
///   period `now` falls in
pub fn disburse(
    beneficiary: &Beneficiary,
    now: DateTime<Utc>,
    trigger: Trigger,
) -> Result<Posting, FinanceError> {
    if !beneficiary.is_alive {
        return Err(FinanceError::invalid_term("beneficiary is deceased"));
    }
    let term_number = beneficiary.current_term;
    let term = beneficiary.current().ok_or_else(|| {
        FinanceError::invalid_term(format!("current term {term_number} does not exist"))
    })?;
    if term.is_closed {
        return Err(FinanceError::invalid_term(format!(
            "term {term_number} is closed"
        )));
    }
    let period = BillingPeriod::for_term(term.term_type, &now).ok_or_else(|| {
        FinanceError::invalid_term("Occasionally terms have no periodic payment")
    })?;
    if term.is_paid_in(&period) {
        return Err(FinanceError::AlreadyPaidThisPeriod { period });
    }
    let amount = term.periodic_amount();
    if amount <= Decimal::ZERO {
        return Err(FinanceError::invalid_term(format!(
            "term {term_number} has no payable amount"
        )));
    }

    let by = match trigger {
        Trigger::Manual => "",
        Trigger::Scheduled => " by System",
    };
    let details = format!(
        "An amount of {amount} PKR has been deducted{by} for the Beneficiary Expense of {period} for the beneficiary named {} against term {term_number}",
        beneficiary.name
    );

    Ok(
        Posting::expense(amount, "Beneficiary Expense", details, now).with_payment(PaymentStamp {
            beneficiary_id: beneficiary.id,
            term_number,
            period,
            amount,
            date: now,
        }),
    )
}

/// Returns true if the monthly cycle at `now` should pay this beneficiary.
///
/// Monthly terms are due every cycle; Yearly terms only in the month their
/// term started.
#[must_use]
pub fn is_due(beneficiary: &Beneficiary, now: &DateTime<Utc>) -> bool {
    if !beneficiary.is_alive {
        return false;
    }
    let Some(term) = beneficiary.open_term() else {
        return false;
    };
    if term.periodic_amount() <= Decimal::ZERO {
        return false;
    }
    match term.term_type {
        TermType::Monthly => true,
        TermType::Yearly => Month::from_date(&term.start_date) == Month::from_date(now),
        TermType::Occasionally => false,
    }
}

/// Outcome of one disbursement cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Beneficiaries looked at.
    pub examined: usize,
    /// Payments made.
    pub disbursed: usize,
    /// Due beneficiaries already paid for the period.
    pub skipped: usize,
    /// Due beneficiaries whose payment failed.
    pub failed: usize,
}

/// Start of the next cycle: 00:00 UTC on the 1st of the following month.
#[must_use]
pub fn next_cycle_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let first_of_month = today.with_day(1).unwrap_or(today);
    let next = first_of_month
        .checked_add_months(chrono::Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    next.and_time(NaiveTime::MIN).and_utc()
}
