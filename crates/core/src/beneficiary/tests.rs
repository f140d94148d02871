//! Tests for the term state machine.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use zakat_shared::types::Currency;

use super::*;
use crate::FinanceError;
use crate::expense::Month;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 15, 10, 0, 0).unwrap()
}

fn new_beneficiary(term_type: TermType) -> NewBeneficiary {
    NewBeneficiary {
        cnic: Some("35202-1234567-1".into()),
        name: "Amina Bibi".into(),
        gender: Gender::Female,
        contact_number: "0300-1234567".into(),
        city: "Lahore".into(),
        area: "Gulberg".into(),
        profession: String::new(),
        family_info: FamilyInfo {
            son: 2,
            daughter: 1,
            adopted: 0,
        },
        mode_of_payment: ModeOfPayment::Cash,
        bank: String::new(),
        account_number: String::new(),
        term_type,
        status: Some(NeedStatus::Widow),
        amount_term: Some(AmountTermInput {
            reason: "monthly support".into(),
            amount_change: dec!(1000),
        }),
        extra_fa: None,
    }
}

fn registered(term_type: TermType) -> Beneficiary {
    TermService::new_beneficiary(new_beneficiary(term_type), now())
        .unwrap()
        .0
}

fn closed(mut b: Beneficiary) -> Beneficiary {
    if let Some(term) = b.current_mut() {
        term.is_closed = true;
        term.end_date = Some(now());
    }
    b
}

#[test]
fn test_new_monthly_beneficiary_pays_first_amount() {
    let (b, posting) = TermService::new_beneficiary(new_beneficiary(TermType::Monthly), now()).unwrap();

    assert_eq!(b.current_term, 1);
    assert_eq!(b.terms.len(), 1);
    assert!(b.is_alive);
    assert_eq!(b.terms[0].periodic_amount(), dec!(1000));
    assert_eq!(posting.net(Currency::Pkr), dec!(-1000));

    let stamp = posting.payment.unwrap();
    assert_eq!(stamp.beneficiary_id, b.id);
    assert_eq!(stamp.term_number, 1);
    assert_eq!(stamp.period, BillingPeriod::monthly(2024, Month::Aug));
}

#[test]
fn test_new_occasional_beneficiary_uses_extra_fa() {
    let mut input = new_beneficiary(TermType::Occasionally);
    input.status = None;
    input.amount_term = None;
    input.extra_fa = Some(ExtraFaInput {
        reason: "surgery".into(),
        amount: dec!(25000),
        date: Some(Utc.with_ymd_and_hms(2024, 7, 30, 0, 0, 0).unwrap()),
        proof: vec!["receipt-1.jpg".into(), " ".into()],
    });

    let (b, posting) = TermService::new_beneficiary(input, now()).unwrap();

    assert_eq!(b.current_term, 0);
    assert!(b.terms.is_empty());
    assert_eq!(b.extra_fa.len(), 1);
    assert_eq!(b.extra_fa[0].proof, vec!["receipt-1.jpg".to_string()]);
    assert!(posting.payment.is_none());
    assert_eq!(posting.expense.unwrap().month, Month::Jul);
}

#[rstest]
#[case::occasional_without_fa(TermType::Occasionally)]
fn test_occasional_requires_extra_fa(#[case] term_type: TermType) {
    let result = TermService::new_beneficiary(new_beneficiary(term_type), now());
    assert!(matches!(result, Err(FinanceError::Validation(_))));
}

#[rstest]
#[case::zero(dec!(0))]
#[case::negative(dec!(-10))]
fn test_first_amount_must_be_positive(#[case] amount: Decimal) {
    let mut input = new_beneficiary(TermType::Monthly);
    input.amount_term = Some(AmountTermInput {
        reason: "x".into(),
        amount_change: amount,
    });
    assert!(matches!(
        TermService::new_beneficiary(input, now()),
        Err(FinanceError::Validation(_))
    ));
}

#[test]
fn test_blank_cnic_is_absent() {
    let mut input = new_beneficiary(TermType::Monthly);
    input.cnic = Some("  ".into());
    let (b, _) = TermService::new_beneficiary(input, now()).unwrap();
    assert!(b.cnic.is_none());
}

#[rstest]
#[case::name("name")]
#[case::cnic("cnic")]
#[case::city("city")]
#[case::account_number("account_number")]
fn test_over_long_fields_rejected(#[case] field: &str) {
    let mut input = new_beneficiary(TermType::Monthly);
    let long = "x".repeat(256);
    match field {
        "name" => input.name = long,
        "cnic" => input.cnic = Some(long),
        "city" => input.city = long,
        _ => input.account_number = long,
    }
    let err = TermService::new_beneficiary(input, now()).unwrap_err();
    assert!(matches!(err, FinanceError::Validation(ref msg) if msg.starts_with(field)));
}

#[test]
fn test_open_term_requires_closed_current_term() {
    let b = registered(TermType::Monthly);
    let input = NewTerm {
        status: NeedStatus::Poor,
        term_type: TermType::Yearly,
        amount_term: AmountTermInput {
            reason: "annual".into(),
            amount_change: dec!(12000),
        },
    };

    assert!(matches!(
        TermService::open_term(&b, input.clone(), now()),
        Err(FinanceError::InvalidTermState(_))
    ));

    let (term, posting) = TermService::open_term(&closed(b), input, now()).unwrap();
    assert_eq!(term.term_type, TermType::Yearly);
    let stamp = posting.payment.unwrap();
    assert_eq!(stamp.term_number, 2);
    assert_eq!(stamp.period, BillingPeriod::yearly(2024));
}

#[test]
fn test_open_term_rejects_occasionally_and_dead() {
    let b = closed(registered(TermType::Monthly));
    let occasional = NewTerm {
        status: NeedStatus::Poor,
        term_type: TermType::Occasionally,
        amount_term: AmountTermInput {
            reason: "x".into(),
            amount_change: dec!(1),
        },
    };
    assert!(matches!(
        TermService::open_term(&b, occasional, now()),
        Err(FinanceError::Validation(_))
    ));

    let mut dead = b;
    dead.is_alive = false;
    let monthly = NewTerm {
        status: NeedStatus::Poor,
        term_type: TermType::Monthly,
        amount_term: AmountTermInput {
            reason: "x".into(),
            amount_change: dec!(1),
        },
    };
    assert!(matches!(
        TermService::open_term(&dead, monthly, now()),
        Err(FinanceError::InvalidTermState(_))
    ));
}

#[test]
fn test_amount_term_increase_and_return() {
    let b = registered(TermType::Monthly);

    let (added, posting) = TermService::add_amount_term(
        &b,
        AmountTermInput {
            reason: "school fees".into(),
            amount_change: dec!(500),
        },
        now(),
    )
    .unwrap();
    assert_eq!(added.amount_change, dec!(500));
    assert_eq!(posting.net(Currency::Pkr), dec!(-500));
    assert!(posting.lines[0].details.contains("deducted"));
    assert!(posting.payment.is_none());

    let (_, posting) = TermService::add_amount_term(
        &b,
        AmountTermInput {
            reason: "reduced need".into(),
            amount_change: dec!(-400),
        },
        now(),
    )
    .unwrap();
    assert_eq!(posting.net(Currency::Pkr), dec!(400));
    assert_eq!(posting.expense.unwrap().amount, dec!(-400));
    assert!(posting.lines[0].details.contains("returned"));
}

#[test]
fn test_amount_term_validation() {
    let b = registered(TermType::Monthly);
    let zero = AmountTermInput {
        reason: "x".into(),
        amount_change: dec!(0),
    };
    assert!(matches!(
        TermService::add_amount_term(&b, zero, now()),
        Err(FinanceError::Validation(_))
    ));

    let below_zero = AmountTermInput {
        reason: "x".into(),
        amount_change: dec!(-1000.01),
    };
    assert!(matches!(
        TermService::add_amount_term(&b, below_zero, now()),
        Err(FinanceError::Validation(_))
    ));

    let on_closed = AmountTermInput {
        reason: "x".into(),
        amount_change: dec!(10),
    };
    assert!(matches!(
        TermService::add_amount_term(&closed(b), on_closed, now()),
        Err(FinanceError::InvalidTermState(_))
    ));
}

#[test]
fn test_amount_term_beyond_decimal_range() {
    let b = registered(TermType::Monthly);
    let huge = AmountTermInput {
        reason: "x".into(),
        amount_change: Decimal::MAX,
    };

    let err = TermService::add_amount_term(&b, huge, now()).unwrap_err();
    assert!(matches!(err, FinanceError::Validation(ref msg) if msg == "amount out of range"));
}

#[test]
fn test_close_term_twice() {
    let b = registered(TermType::Monthly);
    let result = TermService::close_term(&b, Some(" recovered "), now()).unwrap();
    assert_eq!(result.term_number, 1);
    assert_eq!(result.closure_reason, "recovered");
    assert_eq!(result.end_date, now());

    assert!(matches!(
        TermService::close_term(&closed(b), None, now()),
        Err(FinanceError::AlreadyClosed { term_number: 1 })
    ));
}

#[test]
fn test_close_without_term() {
    let mut b = registered(TermType::Monthly);
    b.current_term = 0;
    assert!(matches!(
        TermService::close_term(&b, None, now()),
        Err(FinanceError::InvalidTermState(_))
    ));
}

#[test]
fn test_extra_fa_uses_caller_date() {
    let b = registered(TermType::Monthly);
    let date = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
    let (fa, posting) = TermService::add_extra_fa(
        &b,
        ExtraFaInput {
            reason: "winter clothes".into(),
            amount: dec!(3000),
            date: Some(date),
            proof: vec![],
        },
        now(),
    )
    .unwrap();

    assert_eq!(fa.date, date);
    assert_eq!(posting.at, now());
    let expense = posting.expense.unwrap();
    assert_eq!(expense.year, 2023);
    assert_eq!(expense.month, Month::Dec);
}

#[test]
fn test_extra_fa_validation() {
    let b = registered(TermType::Monthly);
    let no_reason = ExtraFaInput {
        reason: String::new(),
        amount: dec!(10),
        date: None,
        proof: vec![],
    };
    assert!(TermService::add_extra_fa(&b, no_reason, now()).is_err());

    let zero = ExtraFaInput {
        reason: "x".into(),
        amount: dec!(0),
        date: None,
        proof: vec![],
    };
    assert!(TermService::add_extra_fa(&b, zero, now()).is_err());
}

#[test]
fn test_mark_deceased() {
    let b = registered(TermType::Monthly);
    let date = TermService::mark_deceased(&b, None, now()).unwrap();
    assert_eq!(date, now().date_naive());

    let future = NaiveDate::from_ymd_opt(2030, 1, 1);
    assert!(matches!(
        TermService::mark_deceased(&b, future, now()),
        Err(FinanceError::Validation(_))
    ));

    let mut dead = b;
    dead.is_alive = false;
    assert!(matches!(
        TermService::mark_deceased(&dead, None, now()),
        Err(FinanceError::AlreadyDeceased)
    ));
}

#[test]
fn test_committed_amount() {
    let b = registered(TermType::Monthly);
    assert_eq!(b.committed_amount(), dec!(1000));
    assert_eq!(closed(b.clone()).committed_amount(), Decimal::ZERO);

    let mut dead = b;
    dead.is_alive = false;
    assert_eq!(dead.committed_amount(), Decimal::ZERO);
}
