//! Repository trait for finance persistence.

use std::future::Future;

use chrono::NaiveDate;
use zakat_shared::types::BeneficiaryId;

use crate::FinanceError;
use crate::beneficiary::{AmountTerm, Beneficiary, ClosedTerm, ExtraFinancialAssistance, Term};
use crate::conversion::ConversionRecord;
use crate::expense::ExpenseRecord;
use crate::ledger::{Account, Balances, Posting, TransactionLogEntry};
use crate::registry::{Donor, ExtraExpenditure};

/// Repository trait for finance persistence.
///
/// This trait is implemented by the db crate to provide actual database
/// operations, and by [`super::MemoryRepository`] for tests.
///
/// Methods that take a `Posting` must apply the aggregate change, every
/// ledger line, the expense line and the payment stamp atomically, and
/// return the appended log entries in order. A payment stamp whose
/// (beneficiary, term, period) key already exists fails the whole unit
/// with `AlreadyPaidThisPeriod`; one whose term is no longer the open
/// current term of a living beneficiary fails with `InvalidTermState`
/// (see [`Beneficiary::ensure_payable`]). Log entries carry `Posting::at`.
pub trait FinanceRepository: Send + Sync {
    /// Current totals.
    fn balances(&self) -> impl Future<Output = Result<Balances, FinanceError>> + Send;

    /// Totals and the full transaction log in insertion order.
    fn account(&self) -> impl Future<Output = Result<Account, FinanceError>> + Send;

    /// The expense record.
    fn expense_record(&self) -> impl Future<Output = Result<ExpenseRecord, FinanceError>> + Send;

    /// Applies a posting that has no other aggregate change.
    fn apply_posting(
        &self,
        posting: Posting,
    ) -> impl Future<Output = Result<Vec<TransactionLogEntry>, FinanceError>> + Send;

    /// Find beneficiary by ID.
    fn find_beneficiary(
        &self,
        id: BeneficiaryId,
    ) -> impl Future<Output = Result<Option<Beneficiary>, FinanceError>> + Send;

    /// All beneficiaries in registration order.
    fn list_beneficiaries(
        &self,
    ) -> impl Future<Output = Result<Vec<Beneficiary>, FinanceError>> + Send;

    /// Inserts a beneficiary with its first disbursement.
    ///
    /// Fails with `DuplicateCnic` if another beneficiary has the same CNIC.
    fn insert_beneficiary(
        &self,
        beneficiary: Beneficiary,
        posting: Posting,
    ) -> impl Future<Output = Result<Vec<TransactionLogEntry>, FinanceError>> + Send;

    /// Appends a term, points `current_term` at it and applies its first payment.
    fn append_term(
        &self,
        id: BeneficiaryId,
        term: Term,
        posting: Posting,
    ) -> impl Future<Output = Result<Vec<TransactionLogEntry>, FinanceError>> + Send;

    /// Appends an amount term to the current term.
    fn append_amount_term(
        &self,
        id: BeneficiaryId,
        amount_term: AmountTerm,
        posting: Posting,
    ) -> impl Future<Output = Result<Vec<TransactionLogEntry>, FinanceError>> + Send;

    /// Marks the current term closed.
    fn close_term(
        &self,
        id: BeneficiaryId,
        closed: ClosedTerm,
    ) -> impl Future<Output = Result<(), FinanceError>> + Send;

    /// Appends extra financial assistance.
    fn append_extra_fa(
        &self,
        id: BeneficiaryId,
        assistance: ExtraFinancialAssistance,
        posting: Posting,
    ) -> impl Future<Output = Result<Vec<TransactionLogEntry>, FinanceError>> + Send;

    /// Records a death.
    fn mark_deceased(
        &self,
        id: BeneficiaryId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<(), FinanceError>> + Send;

    /// Records a conversion with its ledger legs.
    fn record_conversion(
        &self,
        record: ConversionRecord,
        posting: Posting,
    ) -> impl Future<Output = Result<Vec<TransactionLogEntry>, FinanceError>> + Send;

    /// Conversions in recording order.
    fn list_conversions(
        &self,
    ) -> impl Future<Output = Result<Vec<ConversionRecord>, FinanceError>> + Send;

    /// Records an extra expenditure with its expense posting.
    fn record_extra_expenditure(
        &self,
        expenditure: ExtraExpenditure,
        posting: Posting,
    ) -> impl Future<Output = Result<Vec<TransactionLogEntry>, FinanceError>> + Send;

    /// Extra expenditures, newest first.
    fn list_extra_expenditures(
        &self,
    ) -> impl Future<Output = Result<Vec<ExtraExpenditure>, FinanceError>> + Send;

    /// Inserts a donor.
    fn insert_donor(&self, donor: Donor) -> impl Future<Output = Result<(), FinanceError>> + Send;

    /// Donors, newest first.
    fn list_donors(&self) -> impl Future<Output = Result<Vec<Donor>, FinanceError>> + Send;
}
