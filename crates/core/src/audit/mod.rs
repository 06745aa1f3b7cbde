//! Structured audit events.
//!
//! Every state-changing mutation produces an [`AuditEvent`] that the
//! persistence layer writes inside the same transaction as the mutation
//! itself. Recording activity is part of the atomic output, not a
//! fire-and-forget log line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tesoreria_shared::types::UserId;
use uuid::Uuid;

/// Actions that leave an audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A monthly ledger was opened.
    OpenLedger,
    /// A monthly ledger was closed.
    CloseLedger,
    /// A closed ledger was marked reconciled.
    ReconcileLedger,
    /// A balanced journal batch was recorded.
    CreateEntries,
    /// An expense with its journal line was recorded.
    CreateExpense,
    /// A monthly report was created.
    CreateReport,
    /// A monthly report was submitted.
    SubmitReport,
    /// A monthly report was approved.
    ApproveReport,
    /// A monthly report was rejected.
    RejectReport,
    /// A rejected report was reopened for editing.
    ReopenReport,
    /// A fund event was created.
    CreateEvent,
    /// A fund event was submitted.
    SubmitEvent,
    /// A fund event was approved.
    ApproveEvent,
    /// A fund event was rejected.
    RejectEvent,
    /// Actuals were recorded on an approved fund event.
    AddActuals,
}

impl AuditAction {
    /// Returns the stored string form of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenLedger => "open_ledger",
            Self::CloseLedger => "close_ledger",
            Self::ReconcileLedger => "reconcile_ledger",
            Self::CreateEntries => "create_entries",
            Self::CreateExpense => "create_expense",
            Self::CreateReport => "create_report",
            Self::SubmitReport => "submit_report",
            Self::ApproveReport => "approve_report",
            Self::RejectReport => "reject_report",
            Self::ReopenReport => "reopen_report",
            Self::CreateEvent => "create_event",
            Self::SubmitEvent => "submit_event",
            Self::ApproveEvent => "approve_event",
            Self::RejectEvent => "reject_event",
            Self::AddActuals => "add_actuals",
        }
    }
}

/// A structured audit record for one mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The actor who performed the mutation.
    pub actor: UserId,
    /// What was done.
    pub action: AuditAction,
    /// The kind of entity affected (e.g. "monthly_report").
    pub entity_kind: &'static str,
    /// The affected entity's ID.
    pub entity_id: Uuid,
    /// Action-specific detail payload.
    pub details: serde_json::Value,
    /// When the mutation was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Creates an audit event stamped with the current time.
    #[must_use]
    pub fn new(
        actor: UserId,
        action: AuditAction,
        entity_kind: &'static str,
        entity_id: Uuid,
        details: serde_json::Value,
    ) -> Self {
        Self {
            actor,
            action,
            entity_kind,
            entity_id,
            details,
            recorded_at: Utc::now(),
        }
    }
}
