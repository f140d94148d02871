//! Response views assembled by the finance service.

use rust_decimal::Decimal;
use serde::Serialize;
use zakat_shared::types::BeneficiaryId;

use crate::beneficiary::{Beneficiary, BillingPeriod};
use crate::ledger::{Balances, TransactionLogEntry};

/// Account totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    /// PKR total.
    pub total_amount_pkr: Decimal,
    /// USD total.
    pub total_amount_usd: Decimal,
}

impl From<Balances> for AccountSummary {
    fn from(b: Balances) -> Self {
        Self {
            total_amount_pkr: b.pkr,
            total_amount_usd: b.usd,
        }
    }
}

/// A beneficiary's current periodic commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyExpense {
    /// Beneficiary.
    pub id: BeneficiaryId,
    /// Name.
    pub name: String,
    /// CNIC.
    pub cnic: Option<String>,
    /// Contact number.
    pub contact: String,
    /// City.
    pub city: String,
    /// Area.
    pub area: String,
    /// Periodic amount, zero when dead or without an open term.
    pub monthly_expense: Decimal,
    /// Whether the current period is already paid.
    pub is_paid: bool,
}

impl MonthlyExpense {
    /// View of `beneficiary` at `now`.
    #[must_use]
    pub fn of(beneficiary: &Beneficiary, now: &chrono::DateTime<chrono::Utc>) -> Self {
        let monthly_expense = beneficiary.committed_amount();
        Self {
            id: beneficiary.id,
            name: beneficiary.name.clone(),
            cnic: beneficiary.cnic.clone(),
            contact: beneficiary.contact_number.clone(),
            city: beneficiary.city.clone(),
            area: beneficiary.area.clone(),
            monthly_expense,
            is_paid: !monthly_expense.is_zero() && beneficiary.is_paid_at(now),
        }
    }
}

/// Result of a successful payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    /// Beneficiary paid.
    pub beneficiary_id: BeneficiaryId,
    /// Term paid under.
    pub term_number: u32,
    /// Period covered.
    pub period: BillingPeriod,
    /// Amount paid.
    pub amount: Decimal,
    /// Log entries appended.
    pub transactions: Vec<TransactionLogEntry>,
}
