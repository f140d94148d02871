//! Beneficiary domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zakat_shared::types::BeneficiaryId;

use super::period::BillingPeriod;
use crate::FinanceError;
use crate::macros::string_enum;

/// Category of need a term is funded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedStatus {
    /// Widow.
    Widow,
    /// Orphan.
    Orphan,
    /// Poor.
    Poor,
    /// Disabled.
    Disabled,
    /// Patient.
    Patient,
    /// Student.
    Student,
}

string_enum!(NeedStatus {
    Widow => "Widow",
    Orphan => "Orphan",
    Poor => "Poor",
    Disabled => "Disabled",
    Patient => "Patient",
    Student => "Student",
});

/// How often a term pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermType {
    /// Paid every calendar month.
    Monthly,
    /// Paid once a year, in the term's anniversary month.
    Yearly,
    /// No recurring payment; funded through extra financial assistance.
    Occasionally,
}

string_enum!(TermType {
    Monthly => "Monthly",
    Yearly => "Yearly",
    Occasionally => "Occasionally",
});

/// Gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other.
    Other,
}

string_enum!(Gender {
    Male => "Male",
    Female => "Female",
    Other => "Other",
});

/// How payments are handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeOfPayment {
    /// Cash.
    Cash,
    /// Bank transfer.
    Online,
    /// In person.
    Person,
}

string_enum!(ModeOfPayment {
    Cash => "Cash",
    Online => "Online",
    Person => "Person",
});

/// A signed change to a term's periodic amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountTerm {
    /// Why the amount changed.
    pub reason: String,
    /// Signed change.
    pub amount_change: Decimal,
    /// When the change was made.
    pub date: DateTime<Utc>,
}

/// One payment made under a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Amount paid.
    pub amount: Decimal,
    /// When it was paid.
    pub date: DateTime<Utc>,
}

/// A funding term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Category of need.
    pub status: NeedStatus,
    /// Payment frequency.
    #[serde(rename = "type")]
    pub term_type: TermType,
    /// Amount changes; their sum is the periodic amount.
    pub amount_terms: Vec<AmountTerm>,
    /// Payments made.
    pub payment_history: Vec<PaymentRecord>,
    /// Reason given when closed.
    pub closure_reason: String,
    /// When the term was opened.
    pub start_date: DateTime<Utc>,
    /// When the term was closed.
    pub end_date: Option<DateTime<Utc>>,
    /// Whether the term is closed.
    pub is_closed: bool,
}

impl Term {
    /// Opens a term with its first amount term.
    #[must_use]
    pub fn open(status: NeedStatus, term_type: TermType, first: AmountTerm) -> Self {
        Self {
            status,
            term_type,
            start_date: first.date,
            amount_terms: vec![first],
            payment_history: Vec::new(),
            closure_reason: String::new(),
            end_date: None,
            is_closed: false,
        }
    }

    /// Effective periodic amount.
    #[must_use]
    pub fn periodic_amount(&self) -> Decimal {
        self.amount_terms.iter().map(|t| t.amount_change).sum()
    }

    /// Returns true while the term is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.is_closed
    }

    /// Returns true if a payment already falls inside `period`.
    #[must_use]
    pub fn is_paid_in(&self, period: &BillingPeriod) -> bool {
        self.payment_history
            .iter()
            .any(|payment| period.contains(&payment.date))
    }
}

/// One-off financial assistance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraFinancialAssistance {
    /// Why it was given.
    pub reason: String,
    /// Amount given.
    pub amount: Decimal,
    /// Date the assistance is booked under.
    pub date: DateTime<Utc>,
    /// References to proof documents.
    pub proof: Vec<String>,
}

/// Household composition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyInfo {
    /// Sons.
    #[serde(default)]
    pub son: u32,
    /// Daughters.
    #[serde(default)]
    pub daughter: u32,
    /// Adopted children.
    #[serde(default)]
    pub adopted: u32,
}

/// A person receiving support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    /// Identifier.
    pub id: BeneficiaryId,
    /// National identity card number, unique when present.
    pub cnic: Option<String>,
    /// Full name.
    pub name: String,
    /// Gender.
    pub gender: Gender,
    /// Contact number.
    pub contact_number: String,
    /// City.
    pub city: String,
    /// Area within the city.
    pub area: String,
    /// Profession.
    pub profession: String,
    /// Household composition.
    pub family_info: FamilyInfo,
    /// How payments are handed over.
    pub mode_of_payment: ModeOfPayment,
    /// Bank name.
    pub bank: String,
    /// Bank account number.
    pub account_number: String,
    /// Whether the beneficiary is alive.
    pub is_alive: bool,
    /// Date of death, set only when not alive.
    pub death_date: Option<NaiveDate>,
    /// 1-based index of the current term; 0 when there is none.
    pub current_term: u32,
    /// Terms in the order they were opened.
    pub terms: Vec<Term>,
    /// One-off assistance entries.
    pub extra_fa: Vec<ExtraFinancialAssistance>,
    /// When the beneficiary was registered.
    pub created_at: DateTime<Utc>,
}

impl Beneficiary {
    /// The current term, if `current_term` points inside `terms`.
    #[must_use]
    pub fn current(&self) -> Option<&Term> {
        let idx = usize::try_from(self.current_term).ok()?.checked_sub(1)?;
        self.terms.get(idx)
    }

    /// Mutable current term.
    pub fn current_mut(&mut self) -> Option<&mut Term> {
        let idx = usize::try_from(self.current_term).ok()?.checked_sub(1)?;
        self.terms.get_mut(idx)
    }

    /// The current term if it is open.
    #[must_use]
    pub fn open_term(&self) -> Option<&Term> {
        self.current().filter(|term| term.is_open())
    }

    /// Checks that `term_number` is still the open current term of a living
    /// beneficiary.
    ///
    /// Stores call this when they apply a payment stamp, so a payment
    /// prepared before a close or a death is refused.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTermState` otherwise.
    pub fn ensure_payable(&self, term_number: u32) -> Result<(), FinanceError> {
        if !self.is_alive {
            return Err(FinanceError::invalid_term("beneficiary is deceased"));
        }
        if self.current_term != term_number {
            return Err(FinanceError::invalid_term(format!(
                "term {term_number} is no longer the current term"
            )));
        }
        if self.open_term().is_none() {
            return Err(FinanceError::invalid_term(format!(
                "term {term_number} is closed"
            )));
        }
        Ok(())
    }

    /// Periodic amount currently committed: zero when dead or without an
    /// open term.
    #[must_use]
    pub fn committed_amount(&self) -> Decimal {
        if !self.is_alive {
            return Decimal::ZERO;
        }
        self.open_term().map_or(Decimal::ZERO, Term::periodic_amount)
    }

    /// Returns true if the open current term is already paid for the
    /// period `at` falls in.
    #[must_use]
    pub fn is_paid_at(&self, at: &DateTime<Utc>) -> bool {
        self.open_term().is_some_and(|term| {
            BillingPeriod::for_term(term.term_type, at).is_some_and(|p| term.is_paid_in(&p))
        })
    }

    /// Listing view.
    #[must_use]
    pub fn summary(&self) -> BeneficiarySummary {
        BeneficiarySummary {
            id: self.id,
            name: self.name.clone(),
            cnic: self.cnic.clone(),
            contact_number: self.contact_number.clone(),
            city: self.city.clone(),
            area: self.area.clone(),
            is_alive: self.is_alive,
            current_term: self.current_term,
            term_type: self.current().map(|t| t.term_type),
            status: self.current().map(|t| t.status),
        }
    }
}

/// Listing view of a beneficiary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeneficiarySummary {
    /// Identifier.
    pub id: BeneficiaryId,
    /// Full name.
    pub name: String,
    /// CNIC.
    pub cnic: Option<String>,
    /// Contact number.
    pub contact_number: String,
    /// City.
    pub city: String,
    /// Area.
    pub area: String,
    /// Whether alive.
    pub is_alive: bool,
    /// Current term index.
    pub current_term: u32,
    /// Current term type.
    pub term_type: Option<TermType>,
    /// Current term need status.
    pub status: Option<NeedStatus>,
}

/// First or additional amount of a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountTermInput {
    /// Reason for the amount.
    pub reason: String,
    /// Signed amount change.
    pub amount_change: Decimal,
}

/// Request for one-off assistance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraFaInput {
    /// Reason.
    pub reason: String,
    /// Amount, must be positive.
    pub amount: Decimal,
    /// Booking date; defaults to now.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Proof references.
    #[serde(default)]
    pub proof: Vec<String>,
}

/// Request to open a new term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTerm {
    /// Category of need.
    pub status: NeedStatus,
    /// Payment frequency; `Occasionally` is rejected.
    #[serde(rename = "type")]
    pub term_type: TermType,
    /// First amount term; its amount is paid immediately.
    pub amount_term: AmountTermInput,
}

/// Request to register a beneficiary.
///
/// `Occasionally` beneficiaries need `extra_fa`; the others need `status`
/// and `amount_term`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBeneficiary {
    /// CNIC, empty strings are treated as absent.
    #[serde(default)]
    pub cnic: Option<String>,
    /// Full name.
    pub name: String,
    /// Gender.
    pub gender: Gender,
    /// Contact number.
    #[serde(default)]
    pub contact_number: String,
    /// City.
    pub city: String,
    /// Area.
    pub area: String,
    /// Profession.
    #[serde(default)]
    pub profession: String,
    /// Household composition.
    #[serde(default)]
    pub family_info: FamilyInfo,
    /// How payments are handed over.
    pub mode_of_payment: ModeOfPayment,
    /// Bank name.
    #[serde(default)]
    pub bank: String,
    /// Bank account number.
    #[serde(default)]
    pub account_number: String,
    /// Funding type.
    #[serde(rename = "type")]
    pub term_type: TermType,
    /// Need status of the initial term.
    #[serde(default)]
    pub status: Option<NeedStatus>,
    /// First amount term of the initial term.
    #[serde(default)]
    pub amount_term: Option<AmountTermInput>,
    /// First assistance for `Occasionally` beneficiaries.
    #[serde(default)]
    pub extra_fa: Option<ExtraFaInput>,
}
