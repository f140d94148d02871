//! In-memory repository.
//!
//! One mutex guards the whole state. Each unit of work runs against a copy
//! that replaces the state only when every step succeeded.

use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use zakat_shared::types::BeneficiaryId;

use super::repository::FinanceRepository;
use crate::FinanceError;
use crate::beneficiary::{
    AmountTerm, Beneficiary, ClosedTerm, ExtraFinancialAssistance, PaymentRecord, Term,
};
use crate::conversion::ConversionRecord;
use crate::expense::ExpenseRecord;
use crate::ledger::{Account, Balances, Posting, TransactionLogEntry};
use crate::registry::{Donor, ExtraExpenditure};

#[derive(Debug, Clone, Default)]
struct State {
    account: Account,
    expenses: ExpenseRecord,
    beneficiaries: Vec<Beneficiary>,
    conversions: Vec<ConversionRecord>,
    expenditures: Vec<ExtraExpenditure>,
    donors: Vec<Donor>,
}

impl State {
    fn beneficiary_mut(&mut self, id: BeneficiaryId) -> Result<&mut Beneficiary, FinanceError> {
        self.beneficiaries
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(FinanceError::BeneficiaryNotFound(id))
    }

    fn apply(&mut self, posting: Posting) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        if let Some(stamp) = &posting.payment {
            let beneficiary = self.beneficiary_mut(stamp.beneficiary_id)?;
            beneficiary.ensure_payable(stamp.term_number)?;
            let term = usize::try_from(stamp.term_number)
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|idx| beneficiary.terms.get_mut(idx))
                .ok_or_else(|| {
                    FinanceError::Persistence(format!(
                        "term {} of beneficiary {} does not exist",
                        stamp.term_number, stamp.beneficiary_id
                    ))
                })?;
            if term.is_paid_in(&stamp.period) {
                return Err(FinanceError::AlreadyPaidThisPeriod {
                    period: stamp.period,
                });
            }
            term.payment_history.push(PaymentRecord {
                amount: stamp.amount,
                date: stamp.date,
            });
        }

        if let Some(line) = &posting.expense {
            self.expenses.apply(line)?;
        }

        posting
            .lines
            .iter()
            .map(|line| self.account.apply_line(line, posting.at).cloned())
            .collect()
    }
}

/// Repository backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

impl MemoryRepository {
    /// Creates an empty repository: zero totals, no expenses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        let guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn atomically<T>(
        &self,
        f: impl FnOnce(&mut State) -> Result<T, FinanceError>,
    ) -> Result<T, FinanceError> {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = guard.clone();
        let out = f(&mut next)?;
        *guard = next;
        Ok(out)
    }
}

impl FinanceRepository for MemoryRepository {
    async fn balances(&self) -> Result<Balances, FinanceError> {
        Ok(self.read(|s| s.account.balances()))
    }

    async fn account(&self) -> Result<Account, FinanceError> {
        Ok(self.read(|s| s.account.clone()))
    }

    async fn expense_record(&self) -> Result<ExpenseRecord, FinanceError> {
        Ok(self.read(|s| s.expenses.clone()))
    }

    async fn apply_posting(&self, posting: Posting) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        self.atomically(|s| s.apply(posting))
    }

    async fn find_beneficiary(&self, id: BeneficiaryId) -> Result<Option<Beneficiary>, FinanceError> {
        Ok(self.read(|s| s.beneficiaries.iter().find(|b| b.id == id).cloned()))
    }

    async fn list_beneficiaries(&self) -> Result<Vec<Beneficiary>, FinanceError> {
        Ok(self.read(|s| s.beneficiaries.clone()))
    }

    async fn insert_beneficiary(
        &self,
        beneficiary: Beneficiary,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        self.atomically(|s| {
            if let Some(cnic) = &beneficiary.cnic
                && s.beneficiaries.iter().any(|b| b.cnic.as_ref() == Some(cnic))
            {
                return Err(FinanceError::DuplicateCnic(cnic.clone()));
            }
            s.beneficiaries.push(beneficiary);
            s.apply(posting)
        })
    }

    async fn append_term(
        &self,
        id: BeneficiaryId,
        term: Term,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        self.atomically(|s| {
            let beneficiary = s.beneficiary_mut(id)?;
            if beneficiary.open_term().is_some() {
                return Err(FinanceError::invalid_term(
                    "the current term must be closed before a new term is opened",
                ));
            }
            beneficiary.terms.push(term);
            beneficiary.current_term = u32::try_from(beneficiary.terms.len())
                .map_err(|_| FinanceError::invalid_term("too many terms"))?;
            s.apply(posting)
        })
    }

    async fn append_amount_term(
        &self,
        id: BeneficiaryId,
        amount_term: AmountTerm,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        self.atomically(|s| {
            let beneficiary = s.beneficiary_mut(id)?;
            let term = beneficiary
                .current_mut()
                .filter(|t| t.is_open())
                .ok_or_else(|| FinanceError::invalid_term("no open current term"))?;
            term.amount_terms.push(amount_term);
            s.apply(posting)
        })
    }

    async fn close_term(&self, id: BeneficiaryId, closed: ClosedTerm) -> Result<(), FinanceError> {
        self.atomically(|s| {
            let beneficiary = s.beneficiary_mut(id)?;
            let term = beneficiary
                .current_mut()
                .ok_or_else(|| FinanceError::invalid_term("beneficiary has no current term"))?;
            if term.is_closed {
                return Err(FinanceError::AlreadyClosed {
                    term_number: closed.term_number,
                });
            }
            term.is_closed = true;
            term.closure_reason = closed.closure_reason;
            term.end_date = Some(closed.end_date);
            Ok(())
        })
    }

    async fn append_extra_fa(
        &self,
        id: BeneficiaryId,
        assistance: ExtraFinancialAssistance,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        self.atomically(|s| {
            s.beneficiary_mut(id)?.extra_fa.push(assistance);
            s.apply(posting)
        })
    }

    async fn mark_deceased(&self, id: BeneficiaryId, date: NaiveDate) -> Result<(), FinanceError> {
        self.atomically(|s| {
            let beneficiary = s.beneficiary_mut(id)?;
            if !beneficiary.is_alive {
                return Err(FinanceError::AlreadyDeceased);
            }
            beneficiary.is_alive = false;
            beneficiary.death_date = Some(date);
            Ok(())
        })
    }

    async fn record_conversion(
        &self,
        record: ConversionRecord,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        self.atomically(|s| {
            s.conversions.push(record);
            s.apply(posting)
        })
    }

    async fn list_conversions(&self) -> Result<Vec<ConversionRecord>, FinanceError> {
        Ok(self.read(|s| s.conversions.clone()))
    }

    async fn record_extra_expenditure(
        &self,
        expenditure: ExtraExpenditure,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        self.atomically(|s| {
            s.expenditures.push(expenditure);
            s.apply(posting)
        })
    }

    async fn list_extra_expenditures(&self) -> Result<Vec<ExtraExpenditure>, FinanceError> {
        Ok(self.read(|s| s.expenditures.iter().rev().cloned().collect()))
    }

    async fn insert_donor(&self, donor: Donor) -> Result<(), FinanceError> {
        self.atomically(|s| {
            s.donors.push(donor);
            Ok(())
        })
    }

    async fn list_donors(&self) -> Result<Vec<Donor>, FinanceError> {
        Ok(self.read(|s| s.donors.iter().rev().cloned().collect()))
    }
}
