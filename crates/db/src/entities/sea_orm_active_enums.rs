//! Database-backed enum types.
//!
//! Each enum maps to a Postgres `ENUM` created by the initial migration and
//! converts to and from its domain counterpart in `tesoreria-core`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Monthly ledger lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ledger_status")]
pub enum LedgerStatus {
    /// Ledger accepts postings.
    #[sea_orm(string_value = "open")]
    Open,
    /// Ledger is closed and immutable.
    #[sea_orm(string_value = "closed")]
    Closed,
    /// Closing balance verified against the bank statement.
    #[sea_orm(string_value = "reconciled")]
    Reconciled,
}

impl From<tesoreria_core::period::LedgerStatus> for LedgerStatus {
    fn from(status: tesoreria_core::period::LedgerStatus) -> Self {
        match status {
            tesoreria_core::period::LedgerStatus::Open => Self::Open,
            tesoreria_core::period::LedgerStatus::Closed => Self::Closed,
            tesoreria_core::period::LedgerStatus::Reconciled => Self::Reconciled,
        }
    }
}

impl From<LedgerStatus> for tesoreria_core::period::LedgerStatus {
    fn from(status: LedgerStatus) -> Self {
        match status {
            LedgerStatus::Open => Self::Open,
            LedgerStatus::Closed => Self::Closed,
            LedgerStatus::Reconciled => Self::Reconciled,
        }
    }
}

/// Monthly report approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "report_status")]
pub enum ReportStatus {
    /// Report is being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Report awaits approval.
    #[sea_orm(string_value = "submitted")]
    Submitted,
    /// Report approved and posted to the journal.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Report rejected with a reason.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<tesoreria_core::report::ReportStatus> for ReportStatus {
    fn from(status: tesoreria_core::report::ReportStatus) -> Self {
        match status {
            tesoreria_core::report::ReportStatus::Draft => Self::Draft,
            tesoreria_core::report::ReportStatus::Submitted => Self::Submitted,
            tesoreria_core::report::ReportStatus::Approved => Self::Approved,
            tesoreria_core::report::ReportStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<ReportStatus> for tesoreria_core::report::ReportStatus {
    fn from(status: ReportStatus) -> Self {
        match status {
            ReportStatus::Draft => Self::Draft,
            ReportStatus::Submitted => Self::Submitted,
            ReportStatus::Approved => Self::Approved,
            ReportStatus::Rejected => Self::Rejected,
        }
    }
}

/// Fund event budget status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_status")]
pub enum EventStatus {
    /// Budget is being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Budget awaits approval.
    #[sea_orm(string_value = "submitted")]
    Submitted,
    /// Budget approved; actuals may follow.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Budget rejected with a reason.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<tesoreria_core::event::EventStatus> for EventStatus {
    fn from(status: tesoreria_core::event::EventStatus) -> Self {
        match status {
            tesoreria_core::event::EventStatus::Draft => Self::Draft,
            tesoreria_core::event::EventStatus::Submitted => Self::Submitted,
            tesoreria_core::event::EventStatus::Approved => Self::Approved,
            tesoreria_core::event::EventStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<EventStatus> for tesoreria_core::event::EventStatus {
    fn from(status: EventStatus) -> Self {
        match status {
            EventStatus::Draft => Self::Draft,
            EventStatus::Submitted => Self::Submitted,
            EventStatus::Approved => Self::Approved,
            EventStatus::Rejected => Self::Rejected,
        }
    }
}

/// Whether an event line item is a budgeted estimate or a realized spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_item_kind")]
pub enum EventItemKind {
    /// Planned line item.
    #[sea_orm(string_value = "budget")]
    Budget,
    /// Realized line item, recorded after the event.
    #[sea_orm(string_value = "actual")]
    Actual,
}
