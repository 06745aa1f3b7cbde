//! Fund event domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesoreria_shared::types::{ChurchId, FundEventId, FundId, UserId};

use crate::ledger::EntryInput;

/// Status of a fund event budget in the approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Budget is being drafted.
    Draft,
    /// Budget awaits fund-level approval.
    Submitted,
    /// Budget approved; actuals may be attached after the event date.
    Approved,
    /// Budget rejected with a reason.
    Rejected,
}

impl EventStatus {
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

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One budgeted line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetItem {
    /// What the money is planned for.
    pub description: String,
    /// Budget category.
    pub category: String,
    /// Estimated amount.
    pub estimated: Decimal,
}

/// One realized line item, recorded after the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualItem {
    /// What the money was spent on.
    pub description: String,
    /// Budget category the spend belongs to.
    pub category: String,
    /// Actual amount.
    pub actual: Decimal,
    /// Receipt reference for the spend.
    pub receipt_number: Option<String>,
}

/// Budget vs actual per category: `variance = actual - estimated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVariance {
    /// The category.
    pub category: String,
    /// Total estimated for the category.
    pub estimated: Decimal,
    /// Total actual for the category.
    pub actual: Decimal,
    /// `actual - estimated`; positive means over budget.
    pub variance: Decimal,
}

/// A budgeted, fund-scoped activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundEvent {
    /// Unique identifier.
    pub id: FundEventId,
    /// The fund financing the event.
    pub fund_id: FundId,
    /// Optional church the event is held at.
    pub church_id: Option<ChurchId>,
    /// Event name.
    pub name: String,
    /// When the event takes place.
    pub event_date: NaiveDate,
    /// Planned line items.
    pub budget_items: Vec<BudgetItem>,
    /// Realized line items, attached after the event.
    pub actual_items: Vec<ActualItem>,
    /// Current workflow status.
    pub status: EventStatus,
    /// Who created the event.
    pub created_by: UserId,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
    /// Who submitted the budget.
    pub submitted_by: Option<UserId>,
    /// When the budget was submitted.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Who approved the budget.
    pub approved_by: Option<UserId>,
    /// When the budget was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// Reason for the last rejection, if any.
    pub rejection_reason: Option<String>,
}

impl FundEvent {
    /// Total estimated budget.
    #[must_use]
    pub fn estimated_total(&self) -> Decimal {
        self.budget_items.iter().map(|item| item.estimated).sum()
    }

    /// Total realized spend.
    #[must_use]
    pub fn actual_total(&self) -> Decimal {
        self.actual_items.iter().map(|item| item.actual).sum()
    }
}

/// A fund event workflow transition with its audit data and side effects.
#[derive(Debug, Clone)]
pub enum EventAction {
    /// Submit a draft budget for approval.
    Submit {
        /// The new status after submission.
        new_status: EventStatus,
        /// Who submitted.
        submitted_by: UserId,
        /// When.
        submitted_at: DateTime<Utc>,
    },
    /// Approve a submitted budget.
    Approve {
        /// The new status after approval.
        new_status: EventStatus,
        /// Who approved.
        approved_by: UserId,
        /// When.
        approved_at: DateTime<Utc>,
    },
    /// Reject a submitted budget with a mandatory reason.
    Reject {
        /// The new status after rejection.
        new_status: EventStatus,
        /// Why the budget was rejected.
        reason: String,
    },
    /// Attach actuals to an approved event.
    AddActuals {
        /// The recorded items.
        items: Vec<ActualItem>,
        /// Budget vs actual per category.
        variances: Vec<CategoryVariance>,
        /// Debit-only expense lines against the event's fund.
        expense_entries: Vec<EntryInput>,
    },
}
