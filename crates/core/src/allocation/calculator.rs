//! The allocation calculator.

use rust_decimal::Decimal;
use thiserror::Error;

use tesoreria_shared::types::percent_of;

use super::types::{AllocationConfig, AllocationResult, ExpenseLines, IncomeLines};

/// Validation errors for allocation inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// An income or expense line is negative.
    #[error("Amount for {0} must not be negative")]
    NegativeAmount(&'static str),

    /// The configured percentage is outside 0..=100.
    #[error("National fund percentage must be between 0 and 100, got {0}")]
    InvalidPercent(Decimal),
}

/// Computes the national-fund allocation and pastoral honorarium for one
/// report period.
///
/// - `national_fund = round(pct% * (tithes + offerings))` with banker's
///   rounding to whole currency units.
/// - Designated contributions are summed separately and belong 100% to
///   their target funds; they never enter the percentage computation.
/// - `pastoral_honorarium = total_income - designated_total -
///   operating_expenses - national_fund`, floored at zero. When the raw
///   value is negative the shortfall is reported in
///   [`AllocationResult::deficit`] so the caller sees that the period does
///   not balance.
///
/// # Errors
///
/// Returns [`AllocationError`] for negative line amounts or an out-of-range
/// percentage. Nothing is computed on error.
pub fn allocate(
    income: &IncomeLines,
    expenses: &ExpenseLines,
    config: &AllocationConfig,
) -> Result<AllocationResult, AllocationError> {
    if config.national_fund_percent < Decimal::ZERO
        || config.national_fund_percent > Decimal::ONE_HUNDRED
    {
        return Err(AllocationError::InvalidPercent(config.national_fund_percent));
    }
    if income.tithes < Decimal::ZERO {
        return Err(AllocationError::NegativeAmount("tithes"));
    }
    if income.offerings < Decimal::ZERO {
        return Err(AllocationError::NegativeAmount("offerings"));
    }
    if income.other < Decimal::ZERO {
        return Err(AllocationError::NegativeAmount("other income"));
    }
    if income.designated.iter().any(|l| l.amount < Decimal::ZERO) {
        return Err(AllocationError::NegativeAmount("designated contribution"));
    }
    if expenses.operating.iter().any(|l| l.amount < Decimal::ZERO) {
        return Err(AllocationError::NegativeAmount("operating expense"));
    }

    let national_fund = percent_of(
        income.tithes + income.offerings,
        config.national_fund_percent,
    );
    let designated_total = income.designated_total();
    let total_income = income.total();
    let total_operating_expenses = expenses.total();

    let raw_honorarium =
        total_income - designated_total - total_operating_expenses - national_fund;

    let (pastoral_honorarium, deficit) = if raw_honorarium < Decimal::ZERO {
        (Decimal::ZERO, -raw_honorarium)
    } else {
        (raw_honorarium, Decimal::ZERO)
    };

    Ok(AllocationResult {
        national_fund,
        designated_total,
        total_income,
        total_operating_expenses,
        pastoral_honorarium,
        deficit,
        config_version: config.version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tesoreria_shared::types::FundId;

    use crate::allocation::types::{DesignatedLine, ExpenseLine};

    fn income(tithes: Decimal, offerings: Decimal) -> IncomeLines {
        IncomeLines {
            tithes,
            offerings,
            other: Decimal::ZERO,
            designated: vec![],
        }
    }

    #[test]
    fn test_basic_allocation() {
        // Tithes 1,000,000 + offerings 500,000, no designated, no expenses:
        // national fund = 150,000, honorarium = 1,350,000.
        let result = allocate(
            &income(dec!(1000000), dec!(500000)),
            &ExpenseLines::default(),
            &AllocationConfig::default(),
        )
        .unwrap();

        assert_eq!(result.national_fund, dec!(150000));
        assert_eq!(result.total_income, dec!(1500000));
        assert_eq!(result.pastoral_honorarium, dec!(1350000));
        assert!(result.is_balanced());
    }

    #[test]
    fn test_designated_passes_through_fully() {
        let mut inc = income(dec!(1000000), dec!(500000));
        inc.designated.push(DesignatedLine {
            fund_id: FundId::new(),
            description: "Misiones".to_string(),
            amount: dec!(200000),
        });

        let result = allocate(&inc, &ExpenseLines::default(), &AllocationConfig::default())
            .unwrap();

        // Percentage base excludes the designated contribution.
        assert_eq!(result.national_fund, dec!(150000));
        assert_eq!(result.designated_total, dec!(200000));
        assert_eq!(result.total_income, dec!(1700000));
        // Designated money never reaches the honorarium.
        assert_eq!(result.pastoral_honorarium, dec!(1350000));
    }

    #[test]
    fn test_expenses_reduce_honorarium() {
        let expenses = ExpenseLines {
            operating: vec![ExpenseLine {
                description: "Electricidad".to_string(),
                category: "servicios".to_string(),
                amount: dec!(300000),
            }],
        };

        let result = allocate(
            &income(dec!(1000000), dec!(500000)),
            &expenses,
            &AllocationConfig::default(),
        )
        .unwrap();

        assert_eq!(result.pastoral_honorarium, dec!(1050000));
    }

    #[test]
    fn test_deficit_reported_not_silently_clamped() {
        let expenses = ExpenseLines {
            operating: vec![ExpenseLine {
                description: "Reparaciones".to_string(),
                category: "mantenimiento".to_string(),
                amount: dec!(2000000),
            }],
        };

        let result = allocate(
            &income(dec!(1000000), dec!(500000)),
            &expenses,
            &AllocationConfig::default(),
        )
        .unwrap();

        assert_eq!(result.pastoral_honorarium, Decimal::ZERO);
        // 1,500,000 - 2,000,000 - 150,000 = -650,000
        assert_eq!(result.deficit, dec!(650000));
        assert!(!result.is_balanced());
    }

    #[test]
    fn test_bankers_rounding_on_percentage() {
        // 10% of 25 = 2.5 -> rounds to 2 (half to even)
        let result = allocate(
            &income(dec!(25), dec!(0)),
            &ExpenseLines::default(),
            &AllocationConfig::default(),
        )
        .unwrap();
        assert_eq!(result.national_fund, dec!(2));

        // 10% of 35 = 3.5 -> rounds to 4
        let result = allocate(
            &income(dec!(35), dec!(0)),
            &ExpenseLines::default(),
            &AllocationConfig::default(),
        )
        .unwrap();
        assert_eq!(result.national_fund, dec!(4));
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let result = allocate(
            &income(dec!(-1), dec!(0)),
            &ExpenseLines::default(),
            &AllocationConfig::default(),
        );
        assert_eq!(result, Err(AllocationError::NegativeAmount("tithes")));
    }

    #[test]
    fn test_invalid_percent_rejected() {
        let config = AllocationConfig {
            national_fund_percent: dec!(150),
            version: 1,
        };
        let result = allocate(&income(dec!(100), dec!(0)), &ExpenseLines::default(), &config);
        assert_eq!(result, Err(AllocationError::InvalidPercent(dec!(150))));
    }

    #[test]
    fn test_configurable_percentage() {
        let config = AllocationConfig {
            national_fund_percent: dec!(12),
            version: 2,
        };
        let result = allocate(
            &income(dec!(1000000), dec!(0)),
            &ExpenseLines::default(),
            &config,
        )
        .unwrap();
        assert_eq!(result.national_fund, dec!(120000));
        assert_eq!(result.config_version, 2);
    }
}
