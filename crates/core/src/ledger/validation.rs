//! Business rule validation for journal batches.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tesoreria_shared::types::{FundId, IMBALANCE_TOLERANCE};

use super::balance::FundDelta;
use super::entry::EntryInput;
use super::error::LedgerError;

/// Validates that a set of journal lines forms a balanced batch.
///
/// The balance check runs across the whole batch, not per line:
/// `|Σdebit − Σcredit| ≤ 0.01`.
///
/// # Errors
///
/// Returns an error if the batch is empty, a line is negative or carries
/// both sides, or the totals do not balance.
pub fn validate_batch(entries: &[EntryInput]) -> Result<(), LedgerError> {
    if entries.is_empty() {
        return Err(LedgerError::NoEntries);
    }

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;

    for entry in entries {
        if entry.debit < Decimal::ZERO || entry.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        if !entry.debit.is_zero() && !entry.credit.is_zero() {
            return Err(LedgerError::DualSidedLine);
        }
        total_debits += entry.debit;
        total_credits += entry.credit;
    }

    if (total_debits - total_credits).abs() > IMBALANCE_TOLERANCE {
        return Err(LedgerError::Imbalanced {
            debits: total_debits,
            credits: total_credits,
        });
    }

    Ok(())
}

/// Validates the convenience single-entry line recorded with an expense.
///
/// Expense lines are debit-only and exempt from the batch balance check:
/// they net against the fund's running balance instead of another line.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidExpenseEntry`] unless the line is a
/// positive debit with zero credit.
pub fn validate_expense_entry(entry: &EntryInput) -> Result<(), LedgerError> {
    if entry.debit <= Decimal::ZERO || !entry.credit.is_zero() {
        return Err(LedgerError::InvalidExpenseEntry);
    }
    Ok(())
}

/// Nets a batch of journal lines into one balance delta per fund.
///
/// The delta for a fund is `Σcredit − Σdebit` over its lines. Funds with a
/// zero net effect are still returned so the persistence layer touches
/// their balance row inside the same transaction.
#[must_use]
pub fn resolve_deltas(entries: &[EntryInput]) -> Vec<FundDelta> {
    let mut by_fund: BTreeMap<FundId, Decimal> = BTreeMap::new();
    for entry in entries {
        *by_fund.entry(entry.fund_id).or_insert(Decimal::ZERO) += entry.delta();
    }

    by_fund
        .into_iter()
        .map(|(fund_id, delta)| FundDelta { fund_id, delta })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn entry(fund_id: FundId, debit: Decimal, credit: Decimal) -> EntryInput {
        EntryInput {
            fund_id,
            date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            debit,
            credit,
            description: "asiento".to_string(),
            reference: None,
        }
    }

    #[test]
    fn test_balanced_batch() {
        let fund = FundId::new();
        let entries = vec![
            entry(fund, dec!(150000), dec!(0)),
            entry(FundId::new(), dec!(0), dec!(150000)),
        ];
        assert!(validate_batch(&entries).is_ok());
    }

    #[test]
    fn test_unbalanced_batch() {
        let entries = vec![
            entry(FundId::new(), dec!(100000), dec!(0)),
            entry(FundId::new(), dec!(0), dec!(90000)),
        ];
        assert_eq!(
            validate_batch(&entries),
            Err(LedgerError::Imbalanced {
                debits: dec!(100000),
                credits: dec!(90000),
            })
        );
    }

    #[test]
    fn test_tolerance_allows_rounding_residue() {
        let entries = vec![
            entry(FundId::new(), dec!(100000.01), dec!(0)),
            entry(FundId::new(), dec!(0), dec!(100000)),
        ];
        assert!(validate_batch(&entries).is_ok());
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(validate_batch(&[]), Err(LedgerError::NoEntries));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let entries = vec![entry(FundId::new(), dec!(-1), dec!(0))];
        assert_eq!(validate_batch(&entries), Err(LedgerError::NegativeAmount));
    }

    #[test]
    fn test_dual_sided_line_rejected() {
        let entries = vec![entry(FundId::new(), dec!(10), dec!(10))];
        assert_eq!(validate_batch(&entries), Err(LedgerError::DualSidedLine));
    }

    #[test]
    fn test_expense_entry_is_debit_only() {
        let fund = FundId::new();
        assert!(validate_expense_entry(&entry(fund, dec!(60000), dec!(0))).is_ok());
        assert_eq!(
            validate_expense_entry(&entry(fund, dec!(0), dec!(60000))),
            Err(LedgerError::InvalidExpenseEntry)
        );
        assert_eq!(
            validate_expense_entry(&entry(fund, dec!(0), dec!(0))),
            Err(LedgerError::InvalidExpenseEntry)
        );
    }

    #[test]
    fn test_resolve_deltas_nets_per_fund() {
        let general = FundId::new();
        let national = FundId::new();
        let entries = vec![
            entry(general, dec!(150000), dec!(0)),
            entry(national, dec!(0), dec!(150000)),
            entry(general, dec!(0), dec!(50000)),
        ];

        let deltas = resolve_deltas(&entries);
        assert_eq!(deltas.len(), 2);

        let general_delta = deltas.iter().find(|d| d.fund_id == general).unwrap();
        let national_delta = deltas.iter().find(|d| d.fund_id == national).unwrap();
        assert_eq!(general_delta.delta, dec!(-100000));
        assert_eq!(national_delta.delta, dec!(150000));
    }
}
