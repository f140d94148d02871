//! Term state machine transitions.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use zakat_shared::types::BeneficiaryId;

use super::period::BillingPeriod;
use super::types::{
    AmountTerm, AmountTermInput, Beneficiary, ExtraFaInput, ExtraFinancialAssistance, NewBeneficiary,
    NewTerm, Term, TermType,
};
use crate::FinanceError;
use crate::disbursement;
use crate::ledger::{PaymentStamp, Posting};
use crate::validation::{
    MAX_CNIC_LEN, MAX_NAME_LEN, MAX_NUMBER_LEN, MAX_PLACE_LEN, bounded_text, max_chars,
    optional_text, positive_amount,
};

/// Result of closing a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedTerm {
    /// 1-based term number.
    pub term_number: u32,
    /// Reason recorded on the term.
    pub closure_reason: String,
    /// When it was closed.
    pub end_date: DateTime<Utc>,
}

/// Stateless term transitions.
///
/// Every method validates against the beneficiary as loaded and returns
/// what to persist. Nothing is mutated here.
pub struct TermService;

impl TermService {
    /// Builds a new beneficiary and the posting for its first disbursement.
    ///
    /// `Occasionally` beneficiaries get no term and their first extra
    /// assistance is disbursed; all others get term 1 whose first amount is
    /// paid and stamped for the current period.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for missing or over-long fields or non-positive
    /// amounts.
    pub fn new_beneficiary(
        input: NewBeneficiary,
        now: DateTime<Utc>,
    ) -> Result<(Beneficiary, Posting), FinanceError> {
        let mut beneficiary = Beneficiary {
            id: BeneficiaryId::new(),
            cnic: optional_text(input.cnic.as_deref())
                .map(|cnic| max_chars(cnic, "cnic", MAX_CNIC_LEN))
                .transpose()?,
            name: bounded_text(&input.name, "name", MAX_NAME_LEN)?,
            gender: input.gender,
            contact_number: trimmed(&input.contact_number, "contact_number", MAX_NUMBER_LEN)?,
            city: bounded_text(&input.city, "city", MAX_PLACE_LEN)?,
            area: bounded_text(&input.area, "area", MAX_PLACE_LEN)?,
            profession: trimmed(&input.profession, "profession", MAX_PLACE_LEN)?,
            family_info: input.family_info,
            mode_of_payment: input.mode_of_payment,
            bank: trimmed(&input.bank, "bank", MAX_PLACE_LEN)?,
            account_number: trimmed(&input.account_number, "account_number", MAX_NUMBER_LEN)?,
            is_alive: true,
            death_date: None,
            current_term: 0,
            terms: Vec::new(),
            extra_fa: Vec::new(),
            created_at: now,
        };

        if input.term_type == TermType::Occasionally {
            let fa_input = input.extra_fa.ok_or_else(|| {
                FinanceError::validation("extra_fa is required for Occasionally beneficiaries")
            })?;
            let (fa, posting) = Self::add_extra_fa(&beneficiary, fa_input, now)?;
            beneficiary.extra_fa.push(fa);
            return Ok((beneficiary, posting));
        }

        let status = input
            .status
            .ok_or_else(|| FinanceError::validation("status is required"))?;
        let amount_term = input
            .amount_term
            .ok_or_else(|| FinanceError::validation("amount_term is required"))?;
        let (term, posting) = Self::open_term(
            &beneficiary,
            NewTerm {
                status,
                term_type: input.term_type,
                amount_term,
            },
            now,
        )?;
        beneficiary.terms.push(term);
        beneficiary.current_term = 1;
        Ok((beneficiary, posting))
    }

    /// Opens a new term and builds the posting for its first payment.
    ///
    /// The returned term becomes `terms.len() + 1`.
    ///
    /// # Errors
    ///
    /// - `InvalidTermState` if the beneficiary is deceased or the current
    ///   term is still open
    /// - `Validation` for `Occasionally` or an invalid first amount term
    pub fn open_term(
        beneficiary: &Beneficiary,
        input: NewTerm,
        now: DateTime<Utc>,
    ) -> Result<(Term, Posting), FinanceError> {
        require_alive(beneficiary)?;
        if input.term_type == TermType::Occasionally {
            return Err(FinanceError::validation(
                "Occasionally beneficiaries receive extra financial assistance, not terms",
            ));
        }
        if beneficiary.open_term().is_some() {
            return Err(FinanceError::invalid_term(
                "the current term must be closed before a new term is opened",
            ));
        }

        let reason = bounded_text(&input.amount_term.reason, "reason", MAX_NAME_LEN)?;
        let amount = positive_amount(input.amount_term.amount_change, "amount_change")?;
        let term_number = next_term_number(beneficiary)?;

        let term = Term::open(
            input.status,
            input.term_type,
            AmountTerm {
                reason,
                amount_change: amount,
                date: now,
            },
        );

        let period = BillingPeriod::for_term(term.term_type, &now).ok_or_else(|| {
            FinanceError::invalid_term("term type has no billing period")
        })?;
        let posting = Posting::expense(
            amount,
            "Beneficiary Expense",
            format!(
                "An amount of {amount} PKR has been deducted as the first payment of term {term_number} for the beneficiary named {}",
                beneficiary.name
            ),
            now,
        )
        .with_payment(PaymentStamp {
            beneficiary_id: beneficiary.id,
            term_number,
            period,
            amount,
            date: now,
        });

        Ok((term, posting))
    }

    /// Appends an amount change to the open current term.
    ///
    /// The change itself is posted immediately: positive amounts are
    /// deducted, negative amounts are returned.
    ///
    /// # Errors
    ///
    /// - `InvalidTermState` without an open current term or when deceased
    /// - `Validation` for a zero change, a blank reason, or a change that
    ///   would take the periodic amount below zero or out of range
    pub fn add_amount_term(
        beneficiary: &Beneficiary,
        input: AmountTermInput,
        now: DateTime<Utc>,
    ) -> Result<(AmountTerm, Posting), FinanceError> {
        require_alive(beneficiary)?;
        let term = beneficiary
            .open_term()
            .ok_or_else(|| FinanceError::invalid_term("no open current term"))?;

        let reason = bounded_text(&input.reason, "reason", MAX_NAME_LEN)?;
        let change = input.amount_change;
        if change.is_zero() {
            return Err(FinanceError::validation("amount_change must not be zero"));
        }
        let adjusted = term
            .periodic_amount()
            .checked_add(change)
            .ok_or_else(FinanceError::amount_out_of_range)?;
        if adjusted < Decimal::ZERO {
            return Err(FinanceError::validation(
                "amount_change would make the periodic amount negative",
            ));
        }

        let details = if change > Decimal::ZERO {
            format!(
                "An amount of {change} PKR has been deducted for the beneficiary named {} against term {} due to the reason: {reason}",
                beneficiary.name, beneficiary.current_term
            )
        } else {
            format!(
                "An amount of {} PKR has been returned for the beneficiary named {} against term {} due to the reason: {reason}",
                change.abs(),
                beneficiary.name,
                beneficiary.current_term
            )
        };
        let posting = Posting::expense(change, "Amount Term Adjustment", details, now);

        Ok((
            AmountTerm {
                reason,
                amount_change: change,
                date: now,
            },
            posting,
        ))
    }

    /// Closes the current term. No refund is posted.
    ///
    /// # Errors
    ///
    /// - `InvalidTermState` when there is no current term
    /// - `AlreadyClosed` when the current term is closed
    pub fn close_term(
        beneficiary: &Beneficiary,
        closure_reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ClosedTerm, FinanceError> {
        let term = beneficiary
            .current()
            .ok_or_else(|| FinanceError::invalid_term("beneficiary has no current term"))?;
        if term.is_closed {
            return Err(FinanceError::AlreadyClosed {
                term_number: beneficiary.current_term,
            });
        }
        Ok(ClosedTerm {
            term_number: beneficiary.current_term,
            closure_reason: optional_text(closure_reason).unwrap_or_default(),
            end_date: now,
        })
    }

    /// Builds the due-period payment of the current term.
    ///
    /// # Errors
    ///
    /// See [`disbursement::disburse`].
    pub fn pay(beneficiary: &Beneficiary, now: DateTime<Utc>) -> Result<Posting, FinanceError> {
        disbursement::disburse(beneficiary, now, disbursement::Trigger::Manual)
    }

    /// Builds one-off assistance booked under its own date.
    ///
    /// # Errors
    ///
    /// - `InvalidTermState` when deceased
    /// - `Validation` for a blank reason or non-positive amount
    pub fn add_extra_fa(
        beneficiary: &Beneficiary,
        input: ExtraFaInput,
        now: DateTime<Utc>,
    ) -> Result<(ExtraFinancialAssistance, Posting), FinanceError> {
        require_alive(beneficiary)?;
        let reason = bounded_text(&input.reason, "reason", MAX_NAME_LEN)?;
        let amount = positive_amount(input.amount, "amount")?;
        let date = input.date.unwrap_or(now);

        let posting = Posting::expense(
            amount,
            "Extra Financial Assistance",
            format!(
                "An amount of {amount} PKR has been deducted as extra financial assistance for the beneficiary named {} due to the reason: {reason}",
                beneficiary.name
            ),
            date,
        )
        .recorded_at(now);
        let fa = ExtraFinancialAssistance {
            reason,
            amount,
            date,
            proof: input
                .proof
                .into_iter()
                .filter(|p| !p.trim().is_empty())
                .collect(),
        };
        Ok((fa, posting))
    }

    /// Validates a death registration and returns the date to record.
    ///
    /// # Errors
    ///
    /// - `AlreadyDeceased` on a second registration
    /// - `Validation` for a date in the future
    pub fn mark_deceased(
        beneficiary: &Beneficiary,
        date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<NaiveDate, FinanceError> {
        if !beneficiary.is_alive {
            return Err(FinanceError::AlreadyDeceased);
        }
        let today = now.date_naive();
        let date = date.unwrap_or(today);
        if date > today {
            return Err(FinanceError::validation("death date cannot be in the future"));
        }
        Ok(date)
    }
}

fn trimmed(value: &str, field: &str, max: usize) -> Result<String, FinanceError> {
    max_chars(value.trim().to_string(), field, max)
}

fn require_alive(beneficiary: &Beneficiary) -> Result<(), FinanceError> {
    if beneficiary.is_alive {
        Ok(())
    } else {
        Err(FinanceError::invalid_term("beneficiary is deceased"))
    }
}

fn next_term_number(beneficiary: &Beneficiary) -> Result<u32, FinanceError> {
    u32::try_from(beneficiary.terms.len() + 1)
        .map_err(|_| FinanceError::invalid_term("too many terms"))
}
