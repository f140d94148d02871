//! Conversion domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zakat_shared::types::{ConversionId, Currency};

use crate::macros::string_enum;

/// Conversion kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionKind {
    /// Move money from one currency total to the other.
    Convert,
    /// Deposit into one currency total.
    Receive,
}

string_enum!(ConversionKind {
    Convert => "Convert",
    Receive => "Receive",
});

/// Conversion details as submitted; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionDetailsInput {
    /// Date the rate applies to.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Units of target currency per unit of source currency.
    #[serde(default)]
    pub rate: Option<Decimal>,
    /// Target currency code.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Validated conversion details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionDetails {
    /// Date the rate applies to.
    pub date: NaiveDate,
    /// Units of target currency per unit of source currency.
    pub rate: Decimal,
    /// Target currency.
    pub currency: Currency,
}

/// A conversion or deposit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Amount in the source currency.
    pub amount: Decimal,
    /// Source currency code (the deposit currency for `Receive`).
    pub currency: String,
    /// Convert or receive.
    #[serde(rename = "type")]
    pub kind: ConversionKind,
    /// Who deposited or requested the conversion.
    pub depositor: String,
    /// Required for `Convert`, ignored for `Receive`.
    #[serde(default)]
    pub convert: Option<ConversionDetailsInput>,
    /// Reason.
    pub reason: String,
}

/// A recorded conversion or deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Identifier.
    pub id: ConversionId,
    /// Amount in the source currency.
    pub amount: Decimal,
    /// When it was recorded.
    pub date: DateTime<Utc>,
    /// Source currency.
    pub currency: Currency,
    /// Convert or receive.
    #[serde(rename = "type")]
    pub kind: ConversionKind,
    /// Depositor.
    pub depositor: String,
    /// Details of a `Convert`.
    pub convert: Option<ConversionDetails>,
    /// Reason.
    pub reason: String,
}
