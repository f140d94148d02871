//! Finance service and its persistence seam.
//!
//! `FinanceService` orchestrates the pure modules against a
//! `FinanceRepository`. Every mutating repository method receives the
//! aggregate change together with its `Posting` and applies both as one
//! unit of work.

pub mod finance;
pub mod memory;
pub mod repository;
pub mod views;


pub use finance::FinanceService;
pub use memory::MemoryRepository;
pub use repository::FinanceRepository;
pub use views::{AccountSummary, MonthlyExpense, PaymentReceipt};
