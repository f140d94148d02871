//! Postgres implementation of `FinanceRepository`.
//!
//! Every unit of work runs in one database transaction. Account totals are
//! changed with a single `UPDATE ... RETURNING` per ledger line so concurrent
//! postings never lose an update; the returned totals become the log entry's
//! "after" amounts.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, Statement, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;
use zakat_core::FinanceError;
use zakat_core::beneficiary::{
    AmountTerm, Beneficiary, ClosedTerm, ExtraFinancialAssistance, Term,
};
use zakat_core::conversion::ConversionRecord;
use zakat_core::expense::ExpenseRecord;
use zakat_core::ledger::{Account, Balances, ExpenseLine, Posting, TransactionLogEntry};
use zakat_core::registry::{Donor, ExtraExpenditure};
use zakat_core::service::FinanceRepository;
use zakat_shared::types::{BeneficiaryId, Currency};

use super::mapping::{self, db_err, fixed, is_unique_violation, to_i32};
use crate::entities::{
    accounts, amount_terms, beneficiaries, conversion_history, donor_contributions, donors,
    expense_details, extra_expenditures, extra_financial_assistance, payment_history, terms,
    transaction_logs,
};

const APPLY_DELTA_SQL: &str = r"
UPDATE accounts
SET total_amount_pkr = total_amount_pkr + $1,
    total_amount_usd = total_amount_usd + $2,
    updated_at = now()
WHERE id = $3
  AND abs(total_amount_pkr + $1) <= $4
  AND abs(total_amount_usd + $2) <= $4
RETURNING total_amount_pkr, total_amount_usd";

const MONTH_TOTAL_SQL: &str = r"
SELECT COALESCE(SUM(amount), 0) AS total
FROM expense_details
WHERE year = $1 AND month = $2";

/// Finance repository backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgFinanceRepository {
    db: DatabaseConnection,
}

impl PgFinanceRepository {
    /// Creates a new finance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the account row with zero totals if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the database query fails.
    pub async fn ensure_account(&self) -> Result<(), FinanceError> {
        let existing = accounts::Entity::find_by_id(accounts::ACCOUNT_ID)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Ok(());
        }

        let account = accounts::ActiveModel {
            id: Set(accounts::ACCOUNT_ID),
            total_amount_pkr: Set(Decimal::ZERO),
            total_amount_usd: Set(Decimal::ZERO),
            updated_at: Set(fixed(Utc::now())),
        };
        match accounts::Entity::insert(account).exec(&self.db).await {
            Ok(_) => {
                info!("Account created with zero totals");
                Ok(())
            }
            // Another process created it in between.
            Err(e) if is_unique_violation(&e) => Ok(()),
            Err(e) => Err(db_err(e)),
        }
    }
}

// ========== Unit-of-work steps ==========

async fn apply_posting_in<C: ConnectionTrait>(
    db: &C,
    posting: Posting,
) -> Result<Vec<TransactionLogEntry>, FinanceError> {
    if let Some(stamp) = &posting.payment {
        let beneficiary = lock_beneficiary(db, stamp.beneficiary_id).await?;
        beneficiary.ensure_payable(stamp.term_number)?;
        if beneficiary
            .current()
            .is_some_and(|term| term.is_paid_in(&stamp.period))
        {
            return Err(FinanceError::AlreadyPaidThisPeriod {
                period: stamp.period,
            });
        }

        let beneficiary_id = stamp.beneficiary_id.into_inner();
        let term_number = to_i32(stamp.term_number, "term number")?;
        let period_key = stamp.period.key();

        let row = payment_history::ActiveModel {
            beneficiary_id: Set(beneficiary_id),
            term_number: Set(term_number),
            period_key: Set(period_key),
            amount: Set(stamp.amount),
            date: Set(fixed(stamp.date)),
            ..Default::default()
        };
        // The unique key settles a concurrent payment of the same period.
        payment_history::Entity::insert(row)
            .exec(db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    FinanceError::AlreadyPaidThisPeriod {
                        period: stamp.period,
                    }
                } else {
                    db_err(e)
                }
            })?;
    }

    if let Some(line) = &posting.expense {
        insert_expense_detail(db, line).await?;
    }

    let mut entries = Vec::with_capacity(posting.lines.len());
    for line in &posting.lines {
        let (pkr, usd) = match line.currency {
            Currency::Pkr => (line.amount, Decimal::ZERO),
            Currency::Usd => (Decimal::ZERO, line.amount),
        };
        let after = apply_delta(db, pkr, usd).await?;
        let entry = TransactionLogEntry::from_after(after, line, posting.at)?;

        let row = transaction_logs::ActiveModel {
            id: Set(entry.id.into_inner()),
            amount_before_pkr: Set(entry.amount_before_pkr),
            amount_before_usd: Set(entry.amount_before_usd),
            amount_after_pkr: Set(entry.amount_after_pkr),
            amount_after_usd: Set(entry.amount_after_usd),
            timestamp: Set(fixed(entry.timestamp)),
            amount: Set(entry.amount),
            currency: Set(entry.currency.code().to_string()),
            title: Set(entry.title.clone()),
            details: Set(entry.details.clone()),
            ..Default::default()
        };
        transaction_logs::Entity::insert(row)
            .exec(db)
            .await
            .map_err(db_err)?;
        debug!(amount = %entry.amount, currency = %entry.currency, title = %entry.title, "Ledger line applied");
        entries.push(entry);
    }

    Ok(entries)
}

async fn apply_delta<C: ConnectionTrait>(
    db: &C,
    pkr: Decimal,
    usd: Decimal,
) -> Result<Balances, FinanceError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        APPLY_DELTA_SQL,
        [
            pkr.into(),
            usd.into(),
            accounts::ACCOUNT_ID.into(),
            Decimal::MAX.into(),
        ],
    );
    let Some(row) = db.query_one(stmt).await.map_err(db_err)? else {
        // No row: either the totals would leave the decimal range or the
        // account was never created.
        let exists = accounts::Entity::find_by_id(accounts::ACCOUNT_ID)
            .one(db)
            .await
            .map_err(db_err)?
            .is_some();
        return Err(if exists {
            FinanceError::amount_out_of_range()
        } else {
            FinanceError::Persistence("account row is missing".into())
        });
    };
    let total_pkr: Decimal = row.try_get("", "total_amount_pkr").map_err(db_err)?;
    let total_usd: Decimal = row.try_get("", "total_amount_usd").map_err(db_err)?;
    Ok(Balances::new(total_pkr, total_usd))
}

async fn insert_expense_detail<C: ConnectionTrait>(
    db: &C,
    line: &ExpenseLine,
) -> Result<(), FinanceError> {
    let month = mapping::month_number(line.month);
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        MONTH_TOTAL_SQL,
        [line.year.into(), month.into()],
    );
    let total: Decimal = match db.query_one(stmt).await.map_err(db_err)? {
        Some(row) => row.try_get("", "total").map_err(db_err)?,
        None => Decimal::ZERO,
    };
    total
        .checked_add(line.amount)
        .ok_or_else(FinanceError::amount_out_of_range)?;

    let row = expense_details::ActiveModel {
        year: Set(line.year),
        month: Set(month),
        amount: Set(line.amount),
        details: Set(line.details.clone()),
        date: Set(fixed(line.date)),
        ..Default::default()
    };
    expense_details::Entity::insert(row)
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

/// Locks the beneficiary row for the rest of the transaction.
async fn lock_beneficiary<C: ConnectionTrait>(
    db: &C,
    id: BeneficiaryId,
) -> Result<Beneficiary, FinanceError> {
    beneficiaries::Entity::find_by_id(id.into_inner())
        .lock_exclusive()
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or(FinanceError::BeneficiaryNotFound(id))?;
    load_beneficiaries(db, Some(id))
        .await?
        .pop()
        .ok_or(FinanceError::BeneficiaryNotFound(id))
}

async fn insert_term<C: ConnectionTrait>(
    db: &C,
    id: BeneficiaryId,
    term_number: u32,
    term: &Term,
) -> Result<(), FinanceError> {
    let beneficiary_id = id.into_inner();
    let number = to_i32(term_number, "term number")?;
    let row = terms::ActiveModel {
        beneficiary_id: Set(beneficiary_id),
        term_number: Set(number),
        status: Set(term.status.as_str().to_string()),
        term_type: Set(term.term_type.as_str().to_string()),
        closure_reason: Set(term.closure_reason.clone()),
        start_date: Set(fixed(term.start_date)),
        end_date: Set(term.end_date.map(fixed)),
        is_closed: Set(term.is_closed),
    };
    terms::Entity::insert(row).exec(db).await.map_err(db_err)?;

    for amount_term in &term.amount_terms {
        insert_amount_term(db, beneficiary_id, number, amount_term).await?;
    }
    Ok(())
}

async fn insert_amount_term<C: ConnectionTrait>(
    db: &C,
    beneficiary_id: Uuid,
    term_number: i32,
    amount_term: &AmountTerm,
) -> Result<(), FinanceError> {
    let row = amount_terms::ActiveModel {
        beneficiary_id: Set(beneficiary_id),
        term_number: Set(term_number),
        reason: Set(amount_term.reason.clone()),
        amount_change: Set(amount_term.amount_change),
        date: Set(fixed(amount_term.date)),
        ..Default::default()
    };
    amount_terms::Entity::insert(row)
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn insert_extra_fa<C: ConnectionTrait>(
    db: &C,
    id: BeneficiaryId,
    assistance: &ExtraFinancialAssistance,
) -> Result<(), FinanceError> {
    let proof = serde_json::to_value(&assistance.proof)
        .map_err(|e| FinanceError::Persistence(e.to_string()))?;
    let row = extra_financial_assistance::ActiveModel {
        beneficiary_id: Set(id.into_inner()),
        reason: Set(assistance.reason.clone()),
        amount: Set(assistance.amount),
        date: Set(fixed(assistance.date)),
        proof: Set(proof),
        ..Default::default()
    };
    extra_financial_assistance::Entity::insert(row)
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn update_current_term<C: ConnectionTrait>(
    db: &C,
    id: BeneficiaryId,
    current_term: u32,
) -> Result<(), FinanceError> {
    beneficiaries::Entity::update_many()
        .col_expr(
            beneficiaries::Column::CurrentTerm,
            sea_orm::sea_query::Expr::value(to_i32(current_term, "current term")?),
        )
        .filter(beneficiaries::Column::Id.eq(id.into_inner()))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

// ========== Loading ==========

/// Loads beneficiaries with their terms and assistance, in registration order.
async fn load_beneficiaries<C: ConnectionTrait>(
    db: &C,
    only: Option<BeneficiaryId>,
) -> Result<Vec<Beneficiary>, FinanceError> {
    let only = only.map(BeneficiaryId::into_inner);

    let rows = beneficiaries::Entity::find()
        .apply_if(only, |q, id| q.filter(beneficiaries::Column::Id.eq(id)))
        .order_by_asc(beneficiaries::Column::CreatedAt)
        .order_by_asc(beneficiaries::Column::Id)
        .all(db)
        .await
        .map_err(db_err)?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let term_rows = terms::Entity::find()
        .apply_if(only, |q, id| q.filter(terms::Column::BeneficiaryId.eq(id)))
        .order_by_asc(terms::Column::BeneficiaryId)
        .order_by_asc(terms::Column::TermNumber)
        .all(db)
        .await
        .map_err(db_err)?;
    let amount_rows = amount_terms::Entity::find()
        .apply_if(only, |q, id| q.filter(amount_terms::Column::BeneficiaryId.eq(id)))
        .order_by_asc(amount_terms::Column::Seq)
        .all(db)
        .await
        .map_err(db_err)?;
    let payment_rows = payment_history::Entity::find()
        .apply_if(only, |q, id| q.filter(payment_history::Column::BeneficiaryId.eq(id)))
        .order_by_asc(payment_history::Column::Seq)
        .all(db)
        .await
        .map_err(db_err)?;
    let fa_rows = extra_financial_assistance::Entity::find()
        .apply_if(only, |q, id| {
            q.filter(extra_financial_assistance::Column::BeneficiaryId.eq(id))
        })
        .order_by_asc(extra_financial_assistance::Column::Seq)
        .all(db)
        .await
        .map_err(db_err)?;

    let mut amounts: HashMap<(Uuid, i32), Vec<AmountTerm>> = HashMap::new();
    for row in amount_rows {
        amounts
            .entry((row.beneficiary_id, row.term_number))
            .or_default()
            .push(mapping::amount_term(row));
    }
    let mut payments: HashMap<(Uuid, i32), Vec<_>> = HashMap::new();
    for row in payment_rows {
        payments
            .entry((row.beneficiary_id, row.term_number))
            .or_default()
            .push(mapping::payment(row));
    }
    let mut terms_by: HashMap<Uuid, Vec<Term>> = HashMap::new();
    for row in term_rows {
        let key = (row.beneficiary_id, row.term_number);
        let term = mapping::term(
            row,
            amounts.remove(&key).unwrap_or_default(),
            payments.remove(&key).unwrap_or_default(),
        )?;
        terms_by.entry(key.0).or_default().push(term);
    }
    let mut fa_by: HashMap<Uuid, Vec<ExtraFinancialAssistance>> = HashMap::new();
    for row in fa_rows {
        let beneficiary_id = row.beneficiary_id;
        fa_by
            .entry(beneficiary_id)
            .or_default()
            .push(mapping::extra_fa(row)?);
    }

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            mapping::beneficiary(
                row,
                terms_by.remove(&id).unwrap_or_default(),
                fa_by.remove(&id).unwrap_or_default(),
            )
        })
        .collect()
}

impl FinanceRepository for PgFinanceRepository {
    async fn balances(&self) -> Result<Balances, FinanceError> {
        let row = accounts::Entity::find_by_id(accounts::ACCOUNT_ID)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map_or_else(Balances::default, |a| {
            Balances::new(a.total_amount_pkr, a.total_amount_usd)
        }))
    }

    async fn account(&self) -> Result<Account, FinanceError> {
        let balances = self.balances().await?;
        let transaction_logs = transaction_logs::Entity::find()
            .order_by_asc(transaction_logs::Column::Seq)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(mapping::log_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Account {
            total_amount_pkr: balances.pkr,
            total_amount_usd: balances.usd,
            transaction_logs,
        })
    }

    async fn expense_record(&self) -> Result<ExpenseRecord, FinanceError> {
        let rows = expense_details::Entity::find()
            .order_by_asc(expense_details::Column::Seq)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let mut record = ExpenseRecord::new();
        for row in rows {
            let month = mapping::month_from_row(row.month)?;
            record.add_expense_entry(
                row.year,
                month,
                row.amount,
                row.details,
                mapping::utc(row.date),
            )?;
        }
        Ok(record)
    }

    async fn apply_posting(&self, posting: Posting) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let entries = apply_posting_in(&txn, posting).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(entries)
    }

    async fn find_beneficiary(&self, id: BeneficiaryId) -> Result<Option<Beneficiary>, FinanceError> {
        Ok(load_beneficiaries(&self.db, Some(id)).await?.pop())
    }

    async fn list_beneficiaries(&self) -> Result<Vec<Beneficiary>, FinanceError> {
        load_beneficiaries(&self.db, None).await
    }

    async fn insert_beneficiary(
        &self,
        beneficiary: Beneficiary,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        let b = &beneficiary;
        let row = beneficiaries::ActiveModel {
            id: Set(b.id.into_inner()),
            cnic: Set(b.cnic.clone()),
            name: Set(b.name.clone()),
            gender: Set(b.gender.as_str().to_string()),
            contact_number: Set(b.contact_number.clone()),
            city: Set(b.city.clone()),
            area: Set(b.area.clone()),
            profession: Set(b.profession.clone()),
            sons: Set(to_i32(b.family_info.son, "sons")?),
            daughters: Set(to_i32(b.family_info.daughter, "daughters")?),
            adopted: Set(to_i32(b.family_info.adopted, "adopted")?),
            mode_of_payment: Set(b.mode_of_payment.as_str().to_string()),
            bank: Set(b.bank.clone()),
            account_number: Set(b.account_number.clone()),
            is_alive: Set(b.is_alive),
            death_date: Set(b.death_date),
            current_term: Set(to_i32(b.current_term, "current term")?),
            created_at: Set(fixed(b.created_at)),
        };

        let txn = self.db.begin().await.map_err(db_err)?;
        row.insert(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                FinanceError::DuplicateCnic(b.cnic.clone().unwrap_or_default())
            } else {
                db_err(e)
            }
        })?;
        for (idx, term) in b.terms.iter().enumerate() {
            let number =
                u32::try_from(idx + 1).map_err(|_| FinanceError::invalid_term("too many terms"))?;
            insert_term(&txn, b.id, number, term).await?;
        }
        for assistance in &b.extra_fa {
            insert_extra_fa(&txn, b.id, assistance).await?;
        }
        let entries = apply_posting_in(&txn, posting).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(entries)
    }

    async fn append_term(
        &self,
        id: BeneficiaryId,
        term: Term,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let beneficiary = lock_beneficiary(&txn, id).await?;
        if beneficiary.open_term().is_some() {
            return Err(FinanceError::invalid_term(
                "the current term must be closed before a new term is opened",
            ));
        }
        let number = u32::try_from(beneficiary.terms.len() + 1)
            .map_err(|_| FinanceError::invalid_term("too many terms"))?;
        insert_term(&txn, id, number, &term).await?;
        update_current_term(&txn, id, number).await?;
        let entries = apply_posting_in(&txn, posting).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(entries)
    }

    async fn append_amount_term(
        &self,
        id: BeneficiaryId,
        amount_term: AmountTerm,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let beneficiary = lock_beneficiary(&txn, id).await?;
        if beneficiary.open_term().is_none() {
            return Err(FinanceError::invalid_term("no open current term"));
        }
        let number = to_i32(beneficiary.current_term, "term number")?;
        insert_amount_term(&txn, id.into_inner(), number, &amount_term).await?;
        let entries = apply_posting_in(&txn, posting).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(entries)
    }

    async fn close_term(&self, id: BeneficiaryId, closed: ClosedTerm) -> Result<(), FinanceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let beneficiary = lock_beneficiary(&txn, id).await?;
        let term = beneficiary
            .current()
            .ok_or_else(|| FinanceError::invalid_term("beneficiary has no current term"))?;
        if term.is_closed {
            return Err(FinanceError::AlreadyClosed {
                term_number: beneficiary.current_term,
            });
        }

        let row = terms::ActiveModel {
            beneficiary_id: Set(id.into_inner()),
            term_number: Set(to_i32(beneficiary.current_term, "term number")?),
            closure_reason: Set(closed.closure_reason),
            end_date: Set(Some(fixed(closed.end_date))),
            is_closed: Set(true),
            ..Default::default()
        };
        row.update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn append_extra_fa(
        &self,
        id: BeneficiaryId,
        assistance: ExtraFinancialAssistance,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let beneficiary = lock_beneficiary(&txn, id).await?;
        if !beneficiary.is_alive {
            return Err(FinanceError::invalid_term("beneficiary is deceased"));
        }
        insert_extra_fa(&txn, id, &assistance).await?;
        let entries = apply_posting_in(&txn, posting).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(entries)
    }

    async fn mark_deceased(&self, id: BeneficiaryId, date: NaiveDate) -> Result<(), FinanceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let beneficiary = lock_beneficiary(&txn, id).await?;
        if !beneficiary.is_alive {
            return Err(FinanceError::AlreadyDeceased);
        }
        let row = beneficiaries::ActiveModel {
            id: Set(id.into_inner()),
            is_alive: Set(false),
            death_date: Set(Some(date)),
            ..Default::default()
        };
        row.update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn record_conversion(
        &self,
        record: ConversionRecord,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        let convert = record.convert.as_ref();
        let row = conversion_history::ActiveModel {
            id: Set(record.id.into_inner()),
            amount: Set(record.amount),
            date: Set(fixed(record.date)),
            currency: Set(record.currency.code().to_string()),
            kind: Set(record.kind.as_str().to_string()),
            depositor: Set(record.depositor.clone()),
            convert_date: Set(convert.map(|c| c.date)),
            convert_rate: Set(convert.map(|c| c.rate)),
            convert_currency: Set(convert.map(|c| c.currency.code().to_string())),
            reason: Set(record.reason.clone()),
        };

        let txn = self.db.begin().await.map_err(db_err)?;
        conversion_history::Entity::insert(row)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let entries = apply_posting_in(&txn, posting).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(entries)
    }

    async fn list_conversions(&self) -> Result<Vec<ConversionRecord>, FinanceError> {
        conversion_history::Entity::find()
            .order_by_asc(conversion_history::Column::Date)
            .order_by_asc(conversion_history::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(mapping::conversion)
            .collect()
    }

    async fn record_extra_expenditure(
        &self,
        expenditure: ExtraExpenditure,
        posting: Posting,
    ) -> Result<Vec<TransactionLogEntry>, FinanceError> {
        let row = extra_expenditures::ActiveModel {
            id: Set(expenditure.id.into_inner()),
            reason: Set(expenditure.reason.clone()),
            amount: Set(expenditure.amount),
            created_at: Set(fixed(expenditure.created_at)),
        };

        let txn = self.db.begin().await.map_err(db_err)?;
        extra_expenditures::Entity::insert(row)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let entries = apply_posting_in(&txn, posting).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(entries)
    }

    async fn list_extra_expenditures(&self) -> Result<Vec<ExtraExpenditure>, FinanceError> {
        Ok(extra_expenditures::Entity::find()
            .order_by_desc(extra_expenditures::Column::CreatedAt)
            .order_by_desc(extra_expenditures::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(mapping::expenditure)
            .collect())
    }

    async fn insert_donor(&self, donor: Donor) -> Result<(), FinanceError> {
        let donor_id = donor.id.into_inner();
        let row = donors::ActiveModel {
            id: Set(donor_id),
            name: Set(donor.name.clone()),
            country: Set(donor.country.clone()),
            city: Set(donor.city.clone()),
            contact_number: Set(donor.contact_number.clone()),
            created_at: Set(fixed(donor.created_at)),
        };

        let txn = self.db.begin().await.map_err(db_err)?;
        donors::Entity::insert(row)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        for contribution in &donor.contributions {
            let row = donor_contributions::ActiveModel {
                donor_id: Set(donor_id),
                date: Set(contribution.date),
                amount: Set(contribution.amount),
                kind: Set(contribution.kind.as_str().to_string()),
                ..Default::default()
            };
            donor_contributions::Entity::insert(row)
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn list_donors(&self) -> Result<Vec<Donor>, FinanceError> {
        let rows = donors::Entity::find()
            .order_by_desc(donors::Column::CreatedAt)
            .order_by_desc(donors::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let contribution_rows = donor_contributions::Entity::find()
            .order_by_asc(donor_contributions::Column::Seq)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut contributions: HashMap<Uuid, Vec<_>> = HashMap::new();
        for row in contribution_rows {
            let donor_id = row.donor_id;
            contributions
                .entry(donor_id)
                .or_default()
                .push(mapping::contribution(row)?);
        }
        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                mapping::donor(row, contributions.remove(&id).unwrap_or_default())
            })
            .collect())
    }
}
