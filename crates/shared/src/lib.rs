//! Shared types, errors, and configuration for the Zakat ledger.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision and the supported currency set
//! - Typed IDs for type-safe entity references
//! - Request-boundary error types
//! - Configuration management
//! - JWT claims and validation for the externally issued access tokens

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, Role};
pub use config::AppConfig;
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
