//! Row <-> domain conversions and database error mapping.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{DbErr, SqlErr};
use zakat_core::FinanceError;
use zakat_core::beneficiary::{
    AmountTerm, Beneficiary, ExtraFinancialAssistance, FamilyInfo, PaymentRecord, Term,
};
use zakat_core::conversion::{ConversionDetails, ConversionRecord};
use zakat_core::expense::Month;
use zakat_core::ledger::TransactionLogEntry;
use zakat_core::registry::{Donor, DonorContribution, ExtraExpenditure};
use zakat_shared::types::{
    BeneficiaryId, ConversionId, Currency, DonorId, ExpenditureId, LogEntryId,
};

use crate::entities::{
    amount_terms, beneficiaries, conversion_history, donor_contributions, donors,
    extra_expenditures, extra_financial_assistance, payment_history, terms, transaction_logs,
};

pub(crate) fn db_err(err: DbErr) -> FinanceError {
    FinanceError::Persistence(err.to_string())
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn corrupt(what: &str, value: impl std::fmt::Display) -> FinanceError {
    FinanceError::Persistence(format!("stored {what} is invalid: {value}"))
}

fn parse<T: std::str::FromStr>(what: &str, value: &str) -> Result<T, FinanceError> {
    value.parse().map_err(|_| corrupt(what, value))
}

pub(crate) fn utc(at: DateTime<FixedOffset>) -> DateTime<Utc> {
    at.with_timezone(&Utc)
}

pub(crate) fn fixed(at: DateTime<Utc>) -> DateTime<FixedOffset> {
    at.fixed_offset()
}

pub(crate) fn to_i32(value: u32, what: &str) -> Result<i32, FinanceError> {
    i32::try_from(value).map_err(|_| corrupt(what, value))
}

fn to_u32(value: i32, what: &str) -> Result<u32, FinanceError> {
    u32::try_from(value).map_err(|_| corrupt(what, value))
}

pub(crate) fn month_number(month: Month) -> i16 {
    // 1..=12 always fits
    i16::try_from(month.number()).unwrap_or_default()
}

pub(crate) fn month_from_row(value: i16) -> Result<Month, FinanceError> {
    u32::try_from(value)
        .ok()
        .and_then(Month::from_number)
        .ok_or_else(|| corrupt("month", value))
}

pub(crate) fn log_entry(row: transaction_logs::Model) -> Result<TransactionLogEntry, FinanceError> {
    Ok(TransactionLogEntry {
        id: LogEntryId::from_uuid(row.id),
        amount_before_pkr: row.amount_before_pkr,
        amount_before_usd: row.amount_before_usd,
        amount_after_pkr: row.amount_after_pkr,
        amount_after_usd: row.amount_after_usd,
        timestamp: utc(row.timestamp),
        amount: row.amount,
        currency: parse::<Currency>("currency", &row.currency)?,
        title: row.title,
        details: row.details,
    })
}

pub(crate) fn term(
    row: terms::Model,
    amount_terms: Vec<AmountTerm>,
    payment_history: Vec<PaymentRecord>,
) -> Result<Term, FinanceError> {
    Ok(Term {
        status: parse("need status", &row.status)?,
        term_type: parse("term type", &row.term_type)?,
        amount_terms,
        payment_history,
        closure_reason: row.closure_reason,
        start_date: utc(row.start_date),
        end_date: row.end_date.map(utc),
        is_closed: row.is_closed,
    })
}

pub(crate) fn amount_term(row: amount_terms::Model) -> AmountTerm {
    AmountTerm {
        reason: row.reason,
        amount_change: row.amount_change,
        date: utc(row.date),
    }
}

pub(crate) fn payment(row: payment_history::Model) -> PaymentRecord {
    PaymentRecord {
        amount: row.amount,
        date: utc(row.date),
    }
}

pub(crate) fn extra_fa(
    row: extra_financial_assistance::Model,
) -> Result<ExtraFinancialAssistance, FinanceError> {
    let proof: Vec<String> =
        serde_json::from_value(row.proof).map_err(|e| corrupt("proof list", e))?;
    Ok(ExtraFinancialAssistance {
        reason: row.reason,
        amount: row.amount,
        date: utc(row.date),
        proof,
    })
}

pub(crate) fn beneficiary(
    row: beneficiaries::Model,
    terms: Vec<Term>,
    extra_fa: Vec<ExtraFinancialAssistance>,
) -> Result<Beneficiary, FinanceError> {
    Ok(Beneficiary {
        id: BeneficiaryId::from_uuid(row.id),
        cnic: row.cnic,
        name: row.name,
        gender: parse("gender", &row.gender)?,
        contact_number: row.contact_number,
        city: row.city,
        area: row.area,
        profession: row.profession,
        family_info: FamilyInfo {
            son: to_u32(row.sons, "sons")?,
            daughter: to_u32(row.daughters, "daughters")?,
            adopted: to_u32(row.adopted, "adopted")?,
        },
        mode_of_payment: parse("mode of payment", &row.mode_of_payment)?,
        bank: row.bank,
        account_number: row.account_number,
        is_alive: row.is_alive,
        death_date: row.death_date,
        current_term: to_u32(row.current_term, "current term")?,
        terms,
        extra_fa,
        created_at: utc(row.created_at),
    })
}

pub(crate) fn conversion(row: conversion_history::Model) -> Result<ConversionRecord, FinanceError> {
    let convert = match (row.convert_date, row.convert_rate, row.convert_currency) {
        (Some(date), Some(rate), Some(currency)) => Some(ConversionDetails {
            date,
            rate,
            currency: parse("currency", &currency)?,
        }),
        _ => None,
    };
    Ok(ConversionRecord {
        id: ConversionId::from_uuid(row.id),
        amount: row.amount,
        date: utc(row.date),
        currency: parse("currency", &row.currency)?,
        kind: parse("conversion kind", &row.kind)?,
        depositor: row.depositor,
        convert,
        reason: row.reason,
    })
}

pub(crate) fn expenditure(row: extra_expenditures::Model) -> ExtraExpenditure {
    ExtraExpenditure {
        id: ExpenditureId::from_uuid(row.id),
        reason: row.reason,
        amount: row.amount,
        created_at: utc(row.created_at),
    }
}

pub(crate) fn contribution(
    row: donor_contributions::Model,
) -> Result<DonorContribution, FinanceError> {
    Ok(DonorContribution {
        date: row.date,
        amount: row.amount,
        kind: parse("donation kind", &row.kind)?,
    })
}

pub(crate) fn donor(row: donors::Model, contributions: Vec<DonorContribution>) -> Donor {
    Donor {
        id: DonorId::from_uuid(row.id),
        name: row.name,
        country: row.country,
        city: row.city,
        contact_number: row.contact_number,
        contributions,
        created_at: utc(row.created_at),
    }
}
