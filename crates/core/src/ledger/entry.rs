//! Journal entry inputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesoreria_shared::types::{ExpenseId, FundEventId, FundId, ReportId};

/// What a journal line was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryReference {
    /// Generated by approving a monthly report.
    Report(ReportId),
    /// Generated alongside an expense record.
    Expense(ExpenseId),
    /// Generated by a fund event (approval or actuals).
    Event(FundEventId),
}

/// One journal line to be recorded.
///
/// A line carries either a debit or a credit, never both. Amounts are
/// whole-guarani decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInput {
    /// The fund this line posts against.
    pub fund_id: FundId,
    /// Accounting date of the line.
    pub date: NaiveDate,
    /// Debit amount (reduces the fund balance).
    pub debit: Decimal,
    /// Credit amount (increases the fund balance).
    pub credit: Decimal,
    /// What the line is for.
    pub description: String,
    /// Origin of the line, if generated.
    pub reference: Option<EntryReference>,
}

impl EntryInput {
    /// Net effect of this line on its fund balance.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.credit - self.debit
    }
}
