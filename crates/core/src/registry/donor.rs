//! Donor registry. Donations reach the ledger through `Receive`
//! conversions; registering a donor posts nothing.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zakat_shared::types::DonorId;

use crate::FinanceError;
use crate::macros::string_enum;
use crate::validation::{MAX_NAME_LEN, MAX_NUMBER_LEN, MAX_PLACE_LEN, bounded_text};

/// Kind of donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonationKind {
    /// Obligatory alms.
    Zakat,
    /// Voluntary charity.
    Sadqah,
    /// End-of-Ramadan charity.
    Fitra,
    /// General good works.
    Kherat,
}

string_enum!(DonationKind {
    Zakat => "Zakat",
    Sadqah => "Sadqah",
    Fitra => "Fitra",
    Kherat => "Kherat",
});

/// One contribution of a donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorContribution {
    /// Date pledged or given.
    pub date: NaiveDate,
    /// Amount, at least 1.
    pub amount: Decimal,
    /// Kind of donation.
    #[serde(rename = "type")]
    pub kind: DonationKind,
}

/// A donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    /// Identifier.
    pub id: DonorId,
    /// Name.
    pub name: String,
    /// Country.
    pub country: String,
    /// City.
    pub city: String,
    /// Contact number.
    pub contact_number: String,
    /// Contributions.
    pub contributions: Vec<DonorContribution>,
    /// When the donor was registered.
    pub created_at: DateTime<Utc>,
}

/// Contribution as submitted.
pub type NewContribution = DonorContribution;

/// Request to register a donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDonor {
    /// Name.
    pub name: String,
    /// Country.
    pub country: String,
    /// City.
    pub city: String,
    /// Contact number.
    pub contact_number: String,
    /// Contributions.
    #[serde(default)]
    pub contributions: Vec<NewContribution>,
}

impl NewDonor {
    /// Validates and builds the donor.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for blank or over-long fields or a contribution
    /// below 1.
    pub fn prepare(self, now: DateTime<Utc>) -> Result<Donor, FinanceError> {
        if let Some(bad) = self.contributions.iter().find(|c| c.amount < Decimal::ONE) {
            return Err(FinanceError::Validation(format!(
                "contribution amount must be at least 1, got {}",
                bad.amount
            )));
        }
        Ok(Donor {
            id: DonorId::new(),
            name: bounded_text(&self.name, "name", MAX_NAME_LEN)?,
            country: bounded_text(&self.country, "country", MAX_PLACE_LEN)?,
            city: bounded_text(&self.city, "city", MAX_PLACE_LEN)?,
            contact_number: bounded_text(&self.contact_number, "contact_number", MAX_NUMBER_LEN)?,
            contributions: self.contributions,
            created_at: now,
        })
    }
}
