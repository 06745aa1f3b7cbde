//! The non-negative fund balance rule.
//!
//! Every balance mutation in the system flows through [`apply_delta`]; the
//! persistence layer must never write a balance field directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesoreria_shared::types::FundId;

use super::error::LedgerError;

/// Net effect of a journal batch on one fund's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundDelta {
    /// The affected fund.
    pub fund_id: FundId,
    /// Net change: `Σcredit − Σdebit` over the batch's lines for this fund.
    pub delta: Decimal,
}

/// Applies a delta to a balance, enforcing `balance >= 0` at rest.
///
/// `correction` marks an explicit correction transaction, the only case in
/// which a negative result is accepted.
///
/// # Errors
///
/// Returns [`LedgerError::NegativeBalance`] with the current balance and
/// the attempted delta when the result would be negative. The caller must
/// abort the entire enclosing transaction so no partial state is
/// observable.
pub fn apply_delta(
    current: Decimal,
    delta: Decimal,
    correction: bool,
) -> Result<Decimal, LedgerError> {
    let next = current + delta;
    if next < Decimal::ZERO && !correction {
        return Err(LedgerError::NegativeBalance {
            current,
            attempted_delta: delta,
        });
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_apply_positive_delta() {
        assert_eq!(apply_delta(dec!(50000), dec!(10000), false).unwrap(), dec!(60000));
    }

    #[test]
    fn test_withdrawal_to_zero_allowed() {
        assert_eq!(apply_delta(dec!(50000), dec!(-50000), false).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_overdraw_rejected_with_values() {
        let err = apply_delta(dec!(50000), dec!(-60000), false).unwrap_err();
        assert_eq!(
            err,
            LedgerError::NegativeBalance {
                current: dec!(50000),
                attempted_delta: dec!(-60000),
            }
        );
    }

    #[test]
    fn test_correction_may_go_negative() {
        assert_eq!(
            apply_delta(dec!(50000), dec!(-60000), true).unwrap(),
            dec!(-10000)
        );
    }
}
