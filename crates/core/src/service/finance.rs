//! Finance service implementation.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use zakat_shared::types::{BeneficiaryId, Money};

use super::repository::FinanceRepository;
use super::views::{AccountSummary, MonthlyExpense, PaymentReceipt};
use crate::FinanceError;
use crate::beneficiary::{
    AmountTermInput, Beneficiary, BeneficiarySummary, ExtraFaInput, NewBeneficiary, NewTerm,
    TermService,
};
use crate::clock::{Clock, SystemClock};
use crate::conversion::{ConversionProcessor, ConversionRecord, ConversionRequest};
use crate::disbursement::{self, CycleReport, Trigger};
use crate::expense::{
    DashboardSummary, Month, MonthAmount, MonthHistory, expenses_summary, month_history,
};
use crate::ledger::{Posting, TransactionLogEntry, parse_currency};
use crate::registry::{Donor, ExtraExpenditure, NewDonor, NewExtraExpenditure};
use crate::validation::{MAX_NAME_LEN, bounded_text};

/// Finance service orchestrating every money-moving operation.
pub struct FinanceService<R: FinanceRepository> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: FinanceRepository> Clone for FinanceService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: FinanceRepository> FinanceService<R> {
    /// Create a new finance service using wall-clock time.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_clock(repo, Arc::new(SystemClock))
    }

    /// Create a new finance service with an explicit clock.
    #[must_use]
    pub fn with_clock(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// The underlying repository.
    #[must_use]
    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    /// Current instant according to the service clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ========== Ledger ==========

    /// Applies a signed amount to one currency total.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` for codes outside PKR/USD and
    /// `Validation` when the total would leave the decimal range, both
    /// before any write.
    pub async fn log_transaction(
        &self,
        amount: Decimal,
        currency: &str,
        title: &str,
        details: &str,
    ) -> Result<TransactionLogEntry, FinanceError> {
        let currency = parse_currency(currency)?;
        let title = bounded_text(title, "title", MAX_NAME_LEN)?;
        let posting = Posting::single(
            Money::new(amount, currency),
            title,
            details.trim(),
            self.now(),
        );
        let mut entries = self.repo.apply_posting(posting).await?;
        entries
            .pop()
            .ok_or_else(|| FinanceError::Persistence("no log entry was appended".into()))
    }

    /// Account totals.
    pub async fn account(&self) -> Result<AccountSummary, FinanceError> {
        Ok(self.repo.balances().await?.into())
    }

    /// Transaction log, newest first.
    pub async fn transaction_logs(&self) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        let mut logs = self.repo.account().await?.transaction_logs;
        logs.reverse();
        Ok(logs)
    }

    // ========== Beneficiaries ==========

    /// Registers a beneficiary and performs the first disbursement.
    ///
    /// # Errors
    ///
    /// - `Validation` for invalid input
    /// - `DuplicateCnic` if the CNIC is taken
    pub async fn add_beneficiary(&self, input: NewBeneficiary) -> Result<Beneficiary, FinanceError> {
        let (beneficiary, posting) = TermService::new_beneficiary(input, self.now())?;
        let id = beneficiary.id;
        self.repo.insert_beneficiary(beneficiary, posting).await?;
        info!(beneficiary_id = %id, "Beneficiary registered");
        self.get_beneficiary(id).await
    }

    /// Fetches a beneficiary.
    ///
    /// # Errors
    ///
    /// Returns `BeneficiaryNotFound` if the ID is unknown.
    pub async fn get_beneficiary(&self, id: BeneficiaryId) -> Result<Beneficiary, FinanceError> {
        self.repo
            .find_beneficiary(id)
            .await?
            .ok_or(FinanceError::BeneficiaryNotFound(id))
    }

    /// Listing of all beneficiaries.
    pub async fn list_beneficiaries(&self) -> Result<Vec<BeneficiarySummary>, FinanceError> {
        Ok(self
            .repo
            .list_beneficiaries()
            .await?
            .iter()
            .map(Beneficiary::summary)
            .collect())
    }

    /// Opens a new term and pays its first amount.
    pub async fn add_term(&self, id: BeneficiaryId, input: NewTerm) -> Result<Beneficiary, FinanceError> {
        let beneficiary = self.get_beneficiary(id).await?;
        let (term, posting) = TermService::open_term(&beneficiary, input, self.now())?;
        self.repo.append_term(id, term, posting).await?;
        info!(beneficiary_id = %id, "Term opened");
        self.get_beneficiary(id).await
    }

    /// Adjusts the open term's periodic amount and posts the change.
    pub async fn add_amount_term(
        &self,
        id: BeneficiaryId,
        input: AmountTermInput,
    ) -> Result<Beneficiary, FinanceError> {
        let beneficiary = self.get_beneficiary(id).await?;
        let (amount_term, posting) = TermService::add_amount_term(&beneficiary, input, self.now())?;
        let change = amount_term.amount_change;
        self.repo.append_amount_term(id, amount_term, posting).await?;
        info!(beneficiary_id = %id, amount_change = %change, "Amount term added");
        self.get_beneficiary(id).await
    }

    /// Closes the current term.
    pub async fn close_term(
        &self,
        id: BeneficiaryId,
        closure_reason: Option<&str>,
    ) -> Result<Beneficiary, FinanceError> {
        let beneficiary = self.get_beneficiary(id).await?;
        let closed = TermService::close_term(&beneficiary, closure_reason, self.now())?;
        let term_number = closed.term_number;
        self.repo.close_term(id, closed).await?;
        info!(beneficiary_id = %id, term_number, "Term closed");
        self.get_beneficiary(id).await
    }

    /// Pays the current term for the current period.
    ///
    /// # Errors
    ///
    /// - `InvalidTermState` when nothing is payable
    /// - `AlreadyPaidThisPeriod` when the period is already paid
    pub async fn pay(&self, id: BeneficiaryId) -> Result<PaymentReceipt, FinanceError> {
        let beneficiary = self.get_beneficiary(id).await?;
        let posting = TermService::pay(&beneficiary, self.now())?;
        self.commit_disbursement(posting).await
    }

    /// Records one-off assistance.
    pub async fn add_extra_fa(
        &self,
        id: BeneficiaryId,
        input: ExtraFaInput,
    ) -> Result<Beneficiary, FinanceError> {
        let beneficiary = self.get_beneficiary(id).await?;
        let (assistance, posting) = TermService::add_extra_fa(&beneficiary, input, self.now())?;
        let amount = assistance.amount;
        self.repo.append_extra_fa(id, assistance, posting).await?;
        info!(beneficiary_id = %id, amount = %amount, "Extra financial assistance recorded");
        self.get_beneficiary(id).await
    }

    /// Registers a death.
    pub async fn mark_deceased(
        &self,
        id: BeneficiaryId,
        date: Option<NaiveDate>,
    ) -> Result<Beneficiary, FinanceError> {
        let beneficiary = self.get_beneficiary(id).await?;
        let date = TermService::mark_deceased(&beneficiary, date, self.now())?;
        self.repo.mark_deceased(id, date).await?;
        info!(beneficiary_id = %id, death_date = %date, "Beneficiary marked deceased");
        self.get_beneficiary(id).await
    }

    /// Per-beneficiary periodic commitment and paid flag.
    pub async fn monthly_expenses(&self) -> Result<Vec<MonthlyExpense>, FinanceError> {
        let now = self.now();
        Ok(self
            .repo
            .list_beneficiaries()
            .await?
            .iter()
            .map(|b| MonthlyExpense::of(b, &now))
            .collect())
    }

    // ========== Disbursement ==========

    /// Runs one disbursement cycle over all beneficiaries.
    ///
    /// A failure for one beneficiary is logged and counted; the cycle goes on.
    ///
    /// # Errors
    ///
    /// Only when the beneficiary list itself cannot be loaded.
    pub async fn run_disbursement_cycle(&self) -> Result<CycleReport, FinanceError> {
        let now = self.now();
        let beneficiaries = self.repo.list_beneficiaries().await?;
        let mut report = CycleReport::default();

        for beneficiary in &beneficiaries {
            report.examined += 1;
            if !disbursement::is_due(beneficiary, &now) {
                continue;
            }
            let result = match disbursement::disburse(beneficiary, now, Trigger::Scheduled) {
                Ok(posting) => self.commit_disbursement(posting).await.map(|_| ()),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => report.disbursed += 1,
                Err(FinanceError::AlreadyPaidThisPeriod { period }) => {
                    debug!(beneficiary_id = %beneficiary.id, %period, "Already paid, skipping");
                    report.skipped += 1;
                }
                Err(e) => {
                    warn!(beneficiary_id = %beneficiary.id, error = %e, "Disbursement failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            examined = report.examined,
            disbursed = report.disbursed,
            skipped = report.skipped,
            failed = report.failed,
            "Disbursement cycle finished"
        );
        Ok(report)
    }

    async fn commit_disbursement(&self, posting: Posting) -> Result<PaymentReceipt, FinanceError> {
        let stamp = posting
            .payment
            .clone()
            .ok_or_else(|| FinanceError::Persistence("disbursement without payment stamp".into()))?;
        let transactions = self.repo.apply_posting(posting).await?;
        info!(
            beneficiary_id = %stamp.beneficiary_id,
            term_number = stamp.term_number,
            period = %stamp.period,
            amount = %stamp.amount,
            "Beneficiary paid"
        );
        Ok(PaymentReceipt {
            beneficiary_id: stamp.beneficiary_id,
            term_number: stamp.term_number,
            period: stamp.period,
            amount: stamp.amount,
            transactions,
        })
    }

    // ========== Conversions ==========

    /// Records and applies a conversion or deposit.
    pub async fn convert(&self, request: ConversionRequest) -> Result<ConversionRecord, FinanceError> {
        let (record, posting) = ConversionProcessor::prepare(request, self.now())?;
        self.repo.record_conversion(record.clone(), posting).await?;
        info!(
            conversion_id = %record.id,
            kind = %record.kind,
            amount = %record.amount,
            currency = %record.currency,
            "Conversion recorded"
        );
        Ok(record)
    }

    /// All conversions.
    pub async fn list_conversions(&self) -> Result<Vec<ConversionRecord>, FinanceError> {
        self.repo.list_conversions().await
    }

    // ========== Extra expenditures & donors ==========

    /// Records a one-off expense without a beneficiary.
    pub async fn add_extra_expenditure(
        &self,
        input: NewExtraExpenditure,
    ) -> Result<ExtraExpenditure, FinanceError> {
        let (expenditure, posting) = input.prepare(self.now())?;
        self.repo
            .record_extra_expenditure(expenditure.clone(), posting)
            .await?;
        info!(expenditure_id = %expenditure.id, amount = %expenditure.amount, "Extra expenditure recorded");
        Ok(expenditure)
    }

    /// Extra expenditures, newest first.
    pub async fn list_extra_expenditures(&self) -> Result<Vec<ExtraExpenditure>, FinanceError> {
        self.repo.list_extra_expenditures().await
    }

    /// Registers a donor.
    pub async fn add_donor(&self, input: NewDonor) -> Result<Donor, FinanceError> {
        let donor = input.prepare(self.now())?;
        self.repo.insert_donor(donor.clone()).await?;
        info!(donor_id = %donor.id, "Donor registered");
        Ok(donor)
    }

    /// Donors, newest first.
    pub async fn list_donors(&self) -> Result<Vec<Donor>, FinanceError> {
        self.repo.list_donors().await
    }

    // ========== Read models ==========

    /// Dashboard summary for the current month.
    pub async fn summary(&self) -> Result<DashboardSummary, FinanceError> {
        let balances = self.repo.balances().await?;
        let record = self.repo.expense_record().await?;
        let sum_expense: Decimal = self
            .repo
            .list_beneficiaries()
            .await?
            .iter()
            .map(Beneficiary::committed_amount)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        Ok(DashboardSummary::build(
            balances,
            &record,
            sum_expense,
            self.now().date_naive(),
        ))
    }

    /// Every stored year's month totals.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no expense was ever recorded.
    pub async fn expenses_summary(&self) -> Result<Vec<MonthAmount>, FinanceError> {
        let record = self.repo.expense_record().await?;
        if record.years.is_empty() {
            return Err(FinanceError::NotFound("no expense records".into()));
        }
        Ok(expenses_summary(&record))
    }

    /// Detail view of one month.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown month name or a year with no records.
    pub async fn expense_history(&self, year: i32, month: &str) -> Result<MonthHistory, FinanceError> {
        let month: Month = month.parse()?;
        let record = self.repo.expense_record().await?;
        month_history(&record, year, month)
            .ok_or_else(|| FinanceError::NotFound(format!("expense year {year}")))
    }
}
