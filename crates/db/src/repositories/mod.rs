//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Every mutation writes its audit row inside the same
//! database transaction as the mutation itself.

pub mod event;
pub mod journal;
pub mod period;
pub mod reference;
pub mod report;
pub mod summary;

pub use event::{CreateEventInput, EventError, EventRepository, EventWithItems, RecordedActuals};
pub use journal::{
    CreateExpenseInput, CreatedBatch, JournalError, JournalRepository, RecordedExpense,
};
pub use period::{LedgerFilter, PeriodError, PeriodRepository};
pub use reference::{ReferenceError, ReferenceRepository};
pub use report::{CreateReportInput, ReportError, ReportRepository};
pub use summary::{
    AccountingSummary, CategoryTotal, EntryListing, ExpenseListing, PeriodFilter, SummaryError,
    SummaryRepository, TrialBalance,
};

use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, DbErr, Set};
use tesoreria_core::audit::AuditEvent;
use uuid::Uuid;

use crate::entities::audit_log;

/// Writes an audit row inside the caller's transaction.
pub(crate) async fn insert_audit(
    txn: &DatabaseTransaction,
    event: &AuditEvent,
) -> Result<audit_log::Model, DbErr> {
    let row = audit_log::ActiveModel {
        id: Set(Uuid::now_v7()),
        actor_id: Set(event.actor.into_inner()),
        action: Set(event.action.as_str().to_string()),
        entity_kind: Set(event.entity_kind.to_string()),
        entity_id: Set(event.entity_id),
        details: Set(event.details.clone()),
        recorded_at: Set(event.recorded_at.into()),
    };
    row.insert(txn).await
}

/// First day of the period and first day of the following month, for
/// half-open date range filters. `None` for an invalid (month, year).
#[must_use]
pub(crate) fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}

/// Month as stored in INTEGER columns. Callers validate 1-12 first.
pub(crate) fn month_column(month: u32) -> i32 {
    i32::try_from(month).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{month_bounds, month_column};
    use chrono::NaiveDate;
    use rstest::rstest;

    #[test]
    fn test_month_bounds_mid_year() {
        let (start, end) = month_bounds(2025, 3).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    }

    #[test]
    fn test_month_bounds_december_wraps() {
        let (start, end) = month_bounds(2025, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    fn test_month_bounds_invalid_month(#[case] month: u32) {
        assert!(month_bounds(2025, month).is_none());
    }

    #[test]
    fn test_month_column() {
        assert_eq!(month_column(1), 1);
        assert_eq!(month_column(12), 12);
    }
}
