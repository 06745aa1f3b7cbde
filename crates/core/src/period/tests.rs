use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tesoreria_shared::types::{ChurchId, UserId};

use super::service::{validate_period, PeriodError, PeriodService};
use super::types::{LedgerStatus, MonthlyLedger};

fn open_ledger(opening: Decimal) -> MonthlyLedger {
    PeriodService::open(ChurchId::new(), 1, 2025, false, Some(opening)).unwrap()
}

#[test]
fn test_open_first_period_starts_at_zero() {
    let ledger = PeriodService::open(ChurchId::new(), 1, 2025, false, None).unwrap();
    assert_eq!(ledger.opening_balance, Decimal::ZERO);
    assert_eq!(ledger.closing_balance, Decimal::ZERO);
    assert_eq!(ledger.status, LedgerStatus::Open);
}

#[test]
fn test_open_carries_forward_prior_closing() {
    let ledger = open_ledger(dec!(1500000));
    assert_eq!(ledger.opening_balance, dec!(1500000));
    // No activity yet: closing mirrors opening.
    assert_eq!(ledger.closing_balance, dec!(1500000));
    assert_eq!(ledger.total_income, Decimal::ZERO);
    assert_eq!(ledger.total_expenses, Decimal::ZERO);
}

#[test]
fn test_open_duplicate_conflicts() {
    let church = ChurchId::new();
    let result = PeriodService::open(church, 1, 2025, true, None);
    assert_eq!(
        result.unwrap_err(),
        PeriodError::AlreadyExists {
            church_id: church,
            month: 1,
            year: 2025,
        }
    );
}

#[test]
fn test_open_rejects_bad_period() {
    assert_eq!(
        PeriodService::open(ChurchId::new(), 13, 2025, false, None).unwrap_err(),
        PeriodError::InvalidMonth(13)
    );
    assert_eq!(
        PeriodService::open(ChurchId::new(), 1, 1999, false, None).unwrap_err(),
        PeriodError::InvalidYear(1999)
    );
}

#[rstest]
#[case(1, 2000)]
#[case(6, 2025)]
#[case(12, 2100)]
fn test_validate_period_accepts(#[case] month: u32, #[case] year: i32) {
    assert!(validate_period(month, year).is_ok());
}

#[rstest]
#[case(0, 2025)]
#[case(13, 2025)]
#[case(1, 1999)]
#[case(12, 2101)]
fn test_validate_period_rejects(#[case] month: u32, #[case] year: i32) {
    assert!(validate_period(month, year).is_err());
}

#[test]
fn test_close_computes_locked_balance() {
    let ledger = open_ledger(dec!(100000));
    let action =
        PeriodService::close(&ledger, dec!(1500000), dec!(300000), UserId::new(), None).unwrap();

    assert_eq!(action.new_status, LedgerStatus::Closed);
    assert_eq!(action.closing_balance, dec!(1300000));
    assert_eq!(action.total_income, dec!(1500000));
    assert_eq!(action.total_expenses, dec!(300000));
}

#[test]
fn test_reclose_always_fails() {
    let mut ledger = open_ledger(dec!(0));
    let action =
        PeriodService::close(&ledger, dec!(1500000), dec!(0), UserId::new(), None).unwrap();
    ledger.status = action.new_status;
    ledger.closing_balance = action.closing_balance;

    let second = PeriodService::close(&ledger, dec!(1), dec!(0), UserId::new(), None);
    assert_eq!(second.unwrap_err(), PeriodError::NotOpen(LedgerStatus::Closed));
    // Nothing mutated by the failed attempt.
    assert_eq!(ledger.closing_balance, dec!(1500000));
}

#[test]
fn test_reconcile_only_from_closed() {
    let mut ledger = open_ledger(dec!(0));
    assert_eq!(
        PeriodService::reconcile(&ledger, UserId::new()).unwrap_err(),
        PeriodError::NotClosed(LedgerStatus::Open)
    );

    ledger.status = LedgerStatus::Closed;
    let action = PeriodService::reconcile(&ledger, UserId::new()).unwrap();
    assert_eq!(action.new_status, LedgerStatus::Reconciled);

    ledger.status = LedgerStatus::Reconciled;
    assert_eq!(
        PeriodService::reconcile(&ledger, UserId::new()).unwrap_err(),
        PeriodError::NotClosed(LedgerStatus::Reconciled)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For every successful close, the closing-balance identity holds
    /// exactly.
    #[test]
    fn prop_closing_balance_identity(
        opening in 0i64..100_000_000i64,
        income in 0i64..100_000_000i64,
        expenses in 0i64..100_000_000i64,
    ) {
        let ledger = open_ledger(Decimal::from(opening));
        let action = PeriodService::close(
            &ledger,
            Decimal::from(income),
            Decimal::from(expenses),
            UserId::new(),
            None,
        ).unwrap();

        prop_assert_eq!(
            action.closing_balance,
            Decimal::from(opening) + Decimal::from(income) - Decimal::from(expenses)
        );
    }

    /// Close succeeds only from the open status.
    #[test]
    fn prop_close_requires_open(status in prop_oneof![
        Just(LedgerStatus::Open),
        Just(LedgerStatus::Closed),
        Just(LedgerStatus::Reconciled),
    ]) {
        let mut ledger = open_ledger(dec!(0));
        ledger.status = status;

        let result = PeriodService::close(&ledger, dec!(0), dec!(0), UserId::new(), None);
        prop_assert_eq!(result.is_ok(), status == LedgerStatus::Open);
    }
}
