//! Allocation domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesoreria_shared::config::AllocationSettings;
use tesoreria_shared::types::FundId;

/// Versioned allocation configuration.
///
/// Passed explicitly into [`crate::allocation::allocate`]; never read from
/// ambient global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Percentage of tithes + offerings allocated to the national fund
    /// (e.g. `10` for 10%).
    pub national_fund_percent: Decimal,
    /// Version of the allocation rules in force.
    pub version: u32,
}

impl From<&AllocationSettings> for AllocationConfig {
    fn from(settings: &AllocationSettings) -> Self {
        Self {
            national_fund_percent: settings.national_fund_percent,
            version: settings.version,
        }
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            national_fund_percent: Decimal::TEN,
            version: 1,
        }
    }
}

/// A designated contribution passed through 100% to a national-level fund,
/// outside the percentage computation (e.g. missions, campaigns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignatedLine {
    /// The fund receiving the full amount.
    pub fund_id: FundId,
    /// What the contribution is for.
    pub description: String,
    /// Contributed amount.
    pub amount: Decimal,
}

/// Income line items for one report period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeLines {
    /// Tithes (subject to the percentage allocation).
    pub tithes: Decimal,
    /// Offerings (subject to the percentage allocation).
    pub offerings: Decimal,
    /// Other local income, outside the percentage computation.
    pub other: Decimal,
    /// Designated contributions passed through to national-level funds.
    pub designated: Vec<DesignatedLine>,
}

impl IncomeLines {
    /// Sum of all designated contributions.
    #[must_use]
    pub fn designated_total(&self) -> Decimal {
        self.designated.iter().map(|line| line.amount).sum()
    }

    /// Total income across all categories.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.tithes + self.offerings + self.other + self.designated_total()
    }
}

/// A single operating expense line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLine {
    /// What the expense was for.
    pub description: String,
    /// Expense category.
    pub category: String,
    /// Expense amount.
    pub amount: Decimal,
}

/// Operating expense line items for one report period.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpenseLines {
    /// Operating expenses paid by the church during the period.
    pub operating: Vec<ExpenseLine>,
}

impl ExpenseLines {
    /// Total operating expenses.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.operating.iter().map(|line| line.amount).sum()
    }
}

/// Output of the allocation calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// The percentage allocation of tithes + offerings, banker's-rounded.
    pub national_fund: Decimal,
    /// Sum of designated contributions (passed through 100%).
    pub designated_total: Decimal,
    /// Total income across all categories.
    pub total_income: Decimal,
    /// Total operating expenses.
    pub total_operating_expenses: Decimal,
    /// Residual left to the local church, floored at zero.
    pub pastoral_honorarium: Decimal,
    /// Amount by which the period fails to balance. Zero when the raw
    /// honorarium was non-negative; positive when it was clamped.
    pub deficit: Decimal,
    /// Version of the allocation config used.
    pub config_version: u32,
}

impl AllocationResult {
    /// Returns true when the period balanced without clamping the honorarium.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.deficit.is_zero()
    }
}
