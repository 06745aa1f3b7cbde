//! Money helpers for whole-guarani amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` values in whole currency units
//! (the guarani has no minor unit), rounded with banker's rounding to
//! minimize cumulative errors.

use rust_decimal::{Decimal, RoundingStrategy};

/// Maximum tolerated difference between total debits and credits in a
/// journal batch. Anything above this is an imbalance.
pub const IMBALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds an amount to whole currency units using banker's rounding
/// (round half to even).
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

/// Applies a percentage to an amount and rounds to whole currency units.
///
/// `percent` is expressed as a percentage value, e.g. `10` for 10%.
#[must_use]
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    round_currency(amount * percent / Decimal::ONE_HUNDRED)
}
