//! Property-based tests for journal validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tesoreria_shared::types::FundId;

use super::balance::apply_delta;
use super::entry::EntryInput;
use super::error::LedgerError;
use super::validation::{resolve_deltas, validate_batch};

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(Decimal::from)
}

fn entry(fund_id: FundId, debit: Decimal, credit: Decimal) -> EntryInput {
    EntryInput {
        fund_id,
        date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        debit,
        credit,
        description: String::new(),
        reference: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any mirrored debit/credit pair validates.
    #[test]
    fn prop_mirrored_pairs_balance(amount in amount_strategy()) {
        let entries = vec![
            entry(FundId::new(), amount, Decimal::ZERO),
            entry(FundId::new(), Decimal::ZERO, amount),
        ];
        prop_assert!(validate_batch(&entries).is_ok());
    }

    /// Any pair differing by more than the tolerance is rejected, and the
    /// error reports both totals.
    #[test]
    fn prop_mismatch_rejected(
        amount in amount_strategy(),
        skew in 1i64..1_000_000i64,
    ) {
        let skew = Decimal::from(skew);
        let entries = vec![
            entry(FundId::new(), amount + skew, Decimal::ZERO),
            entry(FundId::new(), Decimal::ZERO, amount),
        ];
        match validate_batch(&entries) {
            Err(LedgerError::Imbalanced { debits, credits }) => {
                prop_assert_eq!(debits, amount + skew);
                prop_assert_eq!(credits, amount);
            }
            other => prop_assert!(false, "expected Imbalanced, got {:?}", other),
        }
    }

    /// The sum of resolved deltas over a balanced batch is zero: money only
    /// moves between funds, it is never created or destroyed.
    #[test]
    fn prop_balanced_batch_deltas_sum_to_zero(
        amounts in prop::collection::vec(amount_strategy(), 1..8),
    ) {
        let mut entries = Vec::new();
        for amount in &amounts {
            entries.push(entry(FundId::new(), *amount, Decimal::ZERO));
            entries.push(entry(FundId::new(), Decimal::ZERO, *amount));
        }
        prop_assert!(validate_batch(&entries).is_ok());

        let total: Decimal = resolve_deltas(&entries).iter().map(|d| d.delta).sum();
        prop_assert_eq!(total, Decimal::ZERO);
    }

    /// apply_delta never produces a negative balance without the
    /// correction flag.
    #[test]
    fn prop_non_negative_balance_invariant(
        current in 0i64..10_000_000i64,
        delta in -20_000_000i64..20_000_000i64,
    ) {
        let current = Decimal::from(current);
        let delta = Decimal::from(delta);

        match apply_delta(current, delta, false) {
            Ok(next) => prop_assert!(next >= Decimal::ZERO),
            Err(LedgerError::NegativeBalance { current: c, attempted_delta }) => {
                prop_assert_eq!(c, current);
                prop_assert_eq!(attempted_delta, delta);
                prop_assert!(current + delta < Decimal::ZERO);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }
}
