//! Input checks shared by every operation.

use rust_decimal::Decimal;

use crate::FinanceError;

/// Names, titles, depositors and reasons of amount changes.
pub const MAX_NAME_LEN: usize = 255;
/// Cities, areas, countries, professions and banks.
pub const MAX_PLACE_LEN: usize = 128;
/// Contact and account numbers.
pub const MAX_NUMBER_LEN: usize = 64;
/// CNIC.
pub const MAX_CNIC_LEN: usize = 32;

/// Requires a non-blank string and returns it trimmed.
pub fn required_text(value: &str, field: &str) -> Result<String, FinanceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Requires a non-blank string of at most `max` characters, returned trimmed.
pub fn bounded_text(value: &str, field: &str, max: usize) -> Result<String, FinanceError> {
    max_chars(required_text(value, field)?, field, max)
}

/// Rejects a string longer than `max` characters.
pub fn max_chars(value: String, field: &str, max: usize) -> Result<String, FinanceError> {
    if value.chars().count() > max {
        return Err(FinanceError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value)
}

/// Requires a strictly positive amount.
pub fn positive_amount(amount: Decimal, field: &str) -> Result<Decimal, FinanceError> {
    if amount <= Decimal::ZERO {
        return Err(FinanceError::Validation(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(amount)
}

/// Treats blank optional strings as absent.
#[must_use]
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
