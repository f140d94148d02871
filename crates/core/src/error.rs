//! Finance error types for validation, lookup and state errors.
//!
//! Every business-rule violation is detected before any mutation, so a
//! returned error always means nothing was written.

use thiserror::Error;
use zakat_shared::types::BeneficiaryId;

use crate::beneficiary::BillingPeriod;

/// Errors that can occur during finance operations.
#[derive(Debug, Error)]
pub enum FinanceError {
    // ========== Validation Errors ==========
    /// Missing or invalid input field.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The beneficiary's current term cannot accept this operation.
    #[error("Invalid term state: {0}")]
    InvalidTermState(String),

    /// Conversion source and target currency are the same.
    #[error("Source and target currencies must be different")]
    SameCurrency,

    /// Conversion details are missing a date, a positive rate or a target currency.
    #[error("Conversion details must include a date, a positive rate and a target currency")]
    IncompleteConversionDetails,

    /// Currency code outside the supported set.
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    // ========== Lookup Errors ==========
    /// Beneficiary not found.
    #[error("Beneficiary not found: {0}")]
    BeneficiaryNotFound(BeneficiaryId),

    /// Any other missing record (account, expense year or month).
    #[error("Not found: {0}")]
    NotFound(String),

    // ========== State Conflicts ==========
    /// The current term is already closed.
    #[error("Term {term_number} is already closed")]
    AlreadyClosed {
        /// 1-based term number.
        term_number: u32,
    },

    /// A payment already exists for the billing period.
    #[error("Beneficiary has already been paid for {period}")]
    AlreadyPaidThisPeriod {
        /// The billing period that was already paid.
        period: BillingPeriod,
    },

    /// Another beneficiary already uses this CNIC.
    #[error("A beneficiary with CNIC {0} already exists")]
    DuplicateCnic(String),

    /// Beneficiary is already registered as deceased.
    #[error("Beneficiary is already registered as deceased")]
    AlreadyDeceased,

    // ========== Persistence Errors ==========
    /// Storage read or write failed.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl FinanceError {
    /// Shorthand for a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Validation error for arithmetic that leaves the decimal range.
    #[must_use]
    pub fn amount_out_of_range() -> Self {
        Self::Validation("amount out of range".into())
    }

    /// Shorthand for an invalid term state error.
    pub fn invalid_term(msg: impl Into<String>) -> Self {
        Self::InvalidTermState(msg.into())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidTermState(_) => "INVALID_TERM_STATE",
            Self::SameCurrency => "SAME_CURRENCY",
            Self::IncompleteConversionDetails => "INCOMPLETE_CONVERSION_DETAILS",
            Self::UnsupportedCurrency(_) => "UNSUPPORTED_CURRENCY",
            Self::BeneficiaryNotFound(_) => "BENEFICIARY_NOT_FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyClosed { .. } => "ALREADY_CLOSED",
            Self::AlreadyPaidThisPeriod { .. } => "ALREADY_PAID_THIS_PERIOD",
            Self::DuplicateCnic(_) => "DUPLICATE_CNIC",
            Self::AlreadyDeceased => "ALREADY_DECEASED",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::Validation(_)
            | Self::InvalidTermState(_)
            | Self::SameCurrency
            | Self::IncompleteConversionDetails
            | Self::UnsupportedCurrency(_) => 400,

            // 404 Not Found
            Self::BeneficiaryNotFound(_) | Self::NotFound(_) => 404,

            // 409 Conflict - state errors
            Self::AlreadyClosed { .. }
            | Self::AlreadyPaidThisPeriod { .. }
            | Self::DuplicateCnic(_)
            | Self::AlreadyDeceased => 409,

            // 500 Internal Server Error
            Self::Persistence(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::Month;
    use rstest::rstest;

    #[rstest]
    #[case(FinanceError::validation("amount"), 400, "VALIDATION_ERROR")]
    #[case(FinanceError::invalid_term("closed"), 400, "INVALID_TERM_STATE")]
    #[case(FinanceError::SameCurrency, 400, "SAME_CURRENCY")]
    #[case(FinanceError::IncompleteConversionDetails, 400, "INCOMPLETE_CONVERSION_DETAILS")]
    #[case(FinanceError::UnsupportedCurrency("EUR".into()), 400, "UNSUPPORTED_CURRENCY")]
    #[case(FinanceError::BeneficiaryNotFound(BeneficiaryId::new()), 404, "BENEFICIARY_NOT_FOUND")]
    #[case(FinanceError::NotFound("year 1999".into()), 404, "NOT_FOUND")]
    #[case(FinanceError::AlreadyClosed { term_number: 1 }, 409, "ALREADY_CLOSED")]
    #[case(FinanceError::DuplicateCnic("1".into()), 409, "DUPLICATE_CNIC")]
    #[case(FinanceError::AlreadyDeceased, 409, "ALREADY_DECEASED")]
    #[case(FinanceError::Persistence("down".into()), 500, "PERSISTENCE_ERROR")]
    fn test_status_and_code(#[case] err: FinanceError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.http_status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_already_paid_message_names_period() {
        let err = FinanceError::AlreadyPaidThisPeriod {
            period: BillingPeriod::monthly(2024, Month::Aug),
        };
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.to_string(), "Beneficiary has already been paid for 2024-08");
    }
}
