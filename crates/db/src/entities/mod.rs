//! `SeaORM` entity definitions.
//!
//! Enum-like columns (currency, term type, need status, ...) are stored as
//! their text codes and parsed back through the domain enums' `FromStr`.

pub mod accounts;
pub mod amount_terms;
pub mod beneficiaries;
pub mod conversion_history;
pub mod donor_contributions;
pub mod donors;
pub mod expense_details;
pub mod extra_expenditures;
pub mod extra_financial_assistance;
pub mod payment_history;
pub mod terms;
pub mod transaction_logs;
