//! Beneficiaries and their funding terms.
//!
//! A term is Open until closed; a closed term is never reopened, a new one
//! is appended instead. `TermService` validates every transition and
//! returns the aggregate change plus the `Posting` it implies, without
//! touching storage.

pub mod period;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use period::BillingPeriod;
pub use service::{ClosedTerm, TermService};
pub use types::{
    AmountTerm, AmountTermInput, Beneficiary, BeneficiarySummary, ExtraFaInput,
    ExtraFinancialAssistance, FamilyInfo, Gender, ModeOfPayment, NeedStatus, NewBeneficiary,
    NewTerm, PaymentRecord, Term, TermType,
};
