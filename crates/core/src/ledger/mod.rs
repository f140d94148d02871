//! Single-account ledger.
//!
//! This module implements the account the charity's money lives in:
//! - Running PKR and USD totals (no floor, may go negative)
//! - An append-only transaction log with before/after snapshots
//! - Postings: the unit of work every money-moving event produces

pub mod account;
pub mod posting;

#[cfg(test)]
mod account_props;

pub use account::{Account, Balances, TransactionLogEntry, parse_currency};
pub use posting::{ExpenseLine, LedgerLine, PaymentStamp, Posting};
