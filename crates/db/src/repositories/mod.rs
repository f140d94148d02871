//! Repository implementations.

pub mod finance;
mod mapping;

pub use finance::PgFinanceRepository;
