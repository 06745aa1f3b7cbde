//! Monthly ledger domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesoreria_shared::types::{ChurchId, LedgerId, UserId};

/// Status of a monthly ledger period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerStatus {
    /// Period is open; entries and expenses accumulate.
    Open,
    /// Period is closed; totals and closing balance are locked.
    Closed,
    /// Post-close manual review completed. Terminal.
    Reconciled,
}

impl LedgerStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Reconciled => "reconciled",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "reconciled" => Some(Self::Reconciled),
            _ => None,
        }
    }

    /// Returns true once the ledger can no longer take financial mutations.
    #[must_use]
    pub fn is_locked(self) -> bool {
        matches!(self, Self::Closed | Self::Reconciled)
    }
}

impl std::fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One church's accounting window for a month.
///
/// Invariant once closed: `closing_balance == opening_balance +
/// total_income - total_expenses`, computed, never user-supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyLedger {
    /// Unique identifier.
    pub id: LedgerId,
    /// The church this period belongs to.
    pub church_id: ChurchId,
    /// Month (1-12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Prior period's closing balance (0 for a church's first period).
    pub opening_balance: Decimal,
    /// Computed at close: opening + income - expenses.
    pub closing_balance: Decimal,
    /// Income aggregated from approved reports at close.
    pub total_income: Decimal,
    /// Expenses aggregated from dated expense records at close.
    pub total_expenses: Decimal,
    /// Current lifecycle status.
    pub status: LedgerStatus,
    /// Who closed the period.
    pub closed_by: Option<UserId>,
    /// When the period was closed.
    pub closed_at: Option<DateTime<Utc>>,
    /// Free-form close notes.
    pub notes: Option<String>,
}
