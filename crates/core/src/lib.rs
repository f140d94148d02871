//! Core business logic for the Zakat ledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Account totals, transaction log and postings
//! - `expense` - Year/month expense aggregate and its read models
//! - `beneficiary` - Beneficiaries and the term state machine
//! - `disbursement` - Periodic payments and the monthly scheduler
//! - `conversion` - Currency conversions and deposits
//! - `registry` - Extra expenditures and donors
//! - `service` - Finance service and the repository seam

mod macros;

pub mod beneficiary;
pub mod clock;
pub mod conversion;
pub mod disbursement;
pub mod error;
pub mod expense;
pub mod ledger;
pub mod registry;
pub mod service;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::FinanceError;
pub use service::{FinanceRepository, FinanceService, MemoryRepository};
