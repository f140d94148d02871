//! One-off expenses without a beneficiary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zakat_shared::types::ExpenditureId;

use crate::FinanceError;
use crate::ledger::Posting;
use crate::validation::{positive_amount, required_text};

/// A recorded extra expenditure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraExpenditure {
    /// Identifier.
    pub id: ExpenditureId,
    /// Reason.
    pub reason: String,
    /// Amount in PKR.
    pub amount: Decimal,
    /// When it was recorded.
    pub created_at: DateTime<Utc>,
}

/// Request to record an extra expenditure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExtraExpenditure {
    /// Reason.
    pub reason: String,
    /// Amount in PKR, must be positive.
    pub amount: Decimal,
}

impl NewExtraExpenditure {
    /// Validates and builds the record and its expense posting.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank reason or non-positive amount.
    pub fn prepare(self, now: DateTime<Utc>) -> Result<(ExtraExpenditure, Posting), FinanceError> {
        let reason = required_text(&self.reason, "reason")?;
        let amount = positive_amount(self.amount, "amount")?;
        let posting = Posting::expense(
            amount,
            "Extra Expense",
            format!(
                "An amount of {amount} PKR has been deducted for the extra expense entry due to the reason: {reason}"
            ),
            now,
        );
        Ok((
            ExtraExpenditure {
                id: ExpenditureId::new(),
                reason,
                amount,
                created_at: now,
            },
            posting,
        ))
    }
}
