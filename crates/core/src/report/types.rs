//! Monthly report domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tesoreria_shared::types::{ChurchId, ReportId, UserId};

use crate::allocation::{AllocationResult, ExpenseLines, IncomeLines};
use crate::ledger::EntryInput;

/// Status of a monthly report in the approval workflow.
///
/// Valid transitions:
/// - Draft → Submitted (submit)
/// - Submitted → Approved (approve)
/// - Submitted → Rejected (reject)
/// - Rejected → Draft (reopen, for resubmission)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Being drafted by the church; editable.
    Draft,
    /// Awaiting national approval.
    Submitted,
    /// Approved; journal entries recorded. Immutable.
    Approved,
    /// Rejected with a reason; may be reopened.
    Rejected,
}

impl ReportStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bank deposit metadata attached to a report (pass-through fields).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositInfo {
    /// Bank receipt number for the national remittance.
    pub receipt_number: Option<String>,
    /// Date the remittance was deposited.
    pub deposit_date: Option<NaiveDate>,
}

/// One church's monthly financial report.
///
/// Exactly one report may exist per (church, year, month).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// Unique identifier.
    pub id: ReportId,
    /// The submitting church.
    pub church_id: ChurchId,
    /// Month (1-12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Income line items.
    pub income: IncomeLines,
    /// Operating expense line items.
    pub expenses: ExpenseLines,
    /// Bank deposit metadata.
    pub deposit: DepositInfo,
    /// Derived totals, computed at creation and stored.
    pub allocation: AllocationResult,
    /// Current workflow status.
    pub status: ReportStatus,
    /// Who created the report.
    pub created_by: UserId,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Who submitted the report.
    pub submitted_by: Option<UserId>,
    /// When the report was submitted.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Who approved the report.
    pub approved_by: Option<UserId>,
    /// When the report was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// Reason for the last rejection, if any.
    pub rejection_reason: Option<String>,
}

/// A report workflow transition with its audit data and side effects.
#[derive(Debug, Clone)]
pub enum ReportAction {
    /// Submit a draft report for approval.
    Submit {
        /// The new status after submission.
        new_status: ReportStatus,
        /// Who submitted.
        submitted_by: UserId,
        /// When.
        submitted_at: DateTime<Utc>,
    },
    /// Approve a submitted report and generate its journal entries.
    Approve {
        /// The new status after approval.
        new_status: ReportStatus,
        /// Who approved.
        approved_by: UserId,
        /// When.
        approved_at: DateTime<Utc>,
        /// Income recognition line crediting the church general fund.
        income_entry: EntryInput,
        /// Balanced batch moving the allocation and designated splits out
        /// of the general fund.
        allocation_entries: Vec<EntryInput>,
    },
    /// Reject a submitted report with a mandatory reason.
    Reject {
        /// The new status after rejection.
        new_status: ReportStatus,
        /// Why the report was rejected.
        reason: String,
    },
    /// Reopen a rejected report for editing and resubmission.
    Reopen {
        /// The new status after reopening (Draft).
        new_status: ReportStatus,
    },
}
