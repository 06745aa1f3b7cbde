//! Period repository for the monthly ledger lifecycle.
//!
//! Close and reconcile re-check the ledger status in the UPDATE's WHERE
//! clause, so two racing closers cannot both succeed: the loser's guarded
//! update touches zero rows and its transaction rolls back.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use tesoreria_core::audit::{AuditAction, AuditEvent};
use tesoreria_core::auth::Actor;
use tesoreria_core::period::{LedgerStatus, MonthlyLedger, PeriodService};
use tesoreria_shared::error::AppError;
use tesoreria_shared::types::{ChurchId, LedgerId, UserId};

use crate::entities::{
    churches, expense_records, monthly_ledgers, monthly_reports,
    sea_orm_active_enums::{LedgerStatus as DbLedgerStatus, ReportStatus as DbReportStatus},
};

use super::{insert_audit, month_bounds, month_column};

use tesoreria_core::period::PeriodError as LifecycleError;

/// Error types for period operations.
#[derive(Debug, thiserror::Error)]
pub enum PeriodError {
    /// Church not found.
    #[error("Church not found: {0}")]
    ChurchNotFound(Uuid),

    /// No ledger exists for the requested period.
    #[error("No ledger found for church {church_id}, {month}/{year}")]
    LedgerNotFound {
        /// The church.
        church_id: ChurchId,
        /// Requested month.
        month: u32,
        /// Requested year.
        year: i32,
    },

    /// A lifecycle rule was violated.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The ledger's status changed under us; the transition lost a race.
    #[error("Ledger status changed concurrently, please retry")]
    StatusChanged,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::ChurchNotFound(_) | PeriodError::LedgerNotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            PeriodError::Lifecycle(e) => e.into(),
            PeriodError::StatusChanged => Self::Conflict(err.to_string()),
            PeriodError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Filters for ledger listings. Every field is optional; an empty filter
/// lists all ledgers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerFilter {
    /// Limit to one church.
    pub church_id: Option<ChurchId>,
    /// Limit to one calendar year.
    pub year: Option<i32>,
    /// Limit to one month (1-12).
    pub month: Option<u32>,
    /// Limit to one lifecycle status.
    pub status: Option<LedgerStatus>,
}

/// Period repository owning monthly ledger persistence.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a ledger period, carrying forward the prior month's closing
    /// balance.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid period, a missing church, or a
    /// duplicate (church, month, year).
    pub async fn open_ledger(
        &self,
        actor: &Actor,
        church_id: ChurchId,
        month: u32,
        year: i32,
    ) -> Result<monthly_ledgers::Model, PeriodError> {
        let txn = self.db.begin().await?;

        churches::Entity::find_by_id(church_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(PeriodError::ChurchNotFound(church_id.into_inner()))?;

        let already_exists = find_ledger(&txn, church_id, month, year).await?.is_some();

        let (prior_month, prior_year) = if month == 1 {
            (12, year - 1)
        } else {
            (month - 1, year)
        };
        let prior_closing = find_ledger(&txn, church_id, prior_month, prior_year)
            .await?
            .map(|l| l.closing_balance);

        let ledger = PeriodService::open(church_id, month, year, already_exists, prior_closing)?;

        let now = now_tz();
        let row = monthly_ledgers::ActiveModel {
            id: Set(ledger.id.into_inner()),
            church_id: Set(church_id.into_inner()),
            month: Set(month_column(month)),
            year: Set(year),
            opening_balance: Set(ledger.opening_balance),
            closing_balance: Set(ledger.closing_balance),
            total_income: Set(Decimal::ZERO),
            total_expenses: Set(Decimal::ZERO),
            status: Set(DbLedgerStatus::Open),
            notes: Set(None),
            closed_by: Set(None),
            closed_at: Set(None),
            reconciled_by: Set(None),
            reconciled_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::OpenLedger,
            "monthly_ledger",
            row.id,
            serde_json::json!({
                "church_id": church_id,
                "month": month,
                "year": year,
                "opening_balance": row.opening_balance,
            }),
        );
        insert_audit(&txn, &audit).await?;

        txn.commit().await?;

        tracing::info!(church = %church_id, month, year, "ledger period opened");

        Ok(row)
    }

    /// Closes an open ledger, aggregating the period's activity.
    ///
    /// Income is the sum of `total_income` over the period's approved
    /// reports; expenses are the sum of dated expense records. Both are
    /// aggregated inside the same transaction that flips the status, so
    /// the locked closing balance reflects exactly what existed at close
    /// time.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger is missing or not open; an attempt
    /// to re-close a closed ledger always fails.
    pub async fn close_ledger(
        &self,
        actor: &Actor,
        church_id: ChurchId,
        month: u32,
        year: i32,
        notes: Option<String>,
    ) -> Result<monthly_ledgers::Model, PeriodError> {
        let txn = self.db.begin().await?;

        let row = find_ledger(&txn, church_id, month, year)
            .await?
            .ok_or(PeriodError::LedgerNotFound {
                church_id,
                month,
                year,
            })?;
        let ledger = model_to_domain(&row);

        let total_income = approved_report_income(&txn, church_id, month, year).await?;
        let total_expenses = period_expense_total(&txn, church_id, month, year).await?;

        let action = PeriodService::close(&ledger, total_income, total_expenses, actor.user_id, notes)?;

        let updated = monthly_ledgers::Entity::update_many()
            .col_expr(
                monthly_ledgers::Column::Status,
                Expr::value(DbLedgerStatus::Closed),
            )
            .col_expr(
                monthly_ledgers::Column::TotalIncome,
                Expr::value(action.total_income),
            )
            .col_expr(
                monthly_ledgers::Column::TotalExpenses,
                Expr::value(action.total_expenses),
            )
            .col_expr(
                monthly_ledgers::Column::ClosingBalance,
                Expr::value(action.closing_balance),
            )
            .col_expr(
                monthly_ledgers::Column::ClosedBy,
                Expr::value(Some(action.closed_by.into_inner())),
            )
            .col_expr(
                monthly_ledgers::Column::ClosedAt,
                Expr::value(Some(sea_orm::prelude::DateTimeWithTimeZone::from(
                    action.closed_at,
                ))),
            )
            .col_expr(monthly_ledgers::Column::Notes, Expr::value(action.notes.clone()))
            .col_expr(monthly_ledgers::Column::UpdatedAt, Expr::value(now_tz()))
            .filter(monthly_ledgers::Column::Id.eq(row.id))
            .filter(monthly_ledgers::Column::Status.eq(DbLedgerStatus::Open))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(PeriodError::StatusChanged);
        }

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::CloseLedger,
            "monthly_ledger",
            row.id,
            serde_json::json!({
                "church_id": church_id,
                "month": month,
                "year": year,
                "total_income": action.total_income,
                "total_expenses": action.total_expenses,
                "closing_balance": action.closing_balance,
            }),
        );
        insert_audit(&txn, &audit).await?;

        let closed = monthly_ledgers::Entity::find_by_id(row.id)
            .one(&txn)
            .await?
            .ok_or(PeriodError::StatusChanged)?;

        txn.commit().await?;

        tracing::info!(
            church = %church_id,
            month,
            year,
            closing_balance = %closed.closing_balance,
            "ledger period closed"
        );

        Ok(closed)
    }

    /// Marks a closed ledger as reconciled against the bank statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger is missing or not closed.
    pub async fn reconcile_ledger(
        &self,
        actor: &Actor,
        church_id: ChurchId,
        month: u32,
        year: i32,
    ) -> Result<monthly_ledgers::Model, PeriodError> {
        let txn = self.db.begin().await?;

        let row = find_ledger(&txn, church_id, month, year)
            .await?
            .ok_or(PeriodError::LedgerNotFound {
                church_id,
                month,
                year,
            })?;
        let ledger = model_to_domain(&row);

        let action = PeriodService::reconcile(&ledger, actor.user_id)?;

        let updated = monthly_ledgers::Entity::update_many()
            .col_expr(
                monthly_ledgers::Column::Status,
                Expr::value(DbLedgerStatus::Reconciled),
            )
            .col_expr(
                monthly_ledgers::Column::ReconciledBy,
                Expr::value(Some(action.reconciled_by.into_inner())),
            )
            .col_expr(
                monthly_ledgers::Column::ReconciledAt,
                Expr::value(Some(sea_orm::prelude::DateTimeWithTimeZone::from(
                    action.reconciled_at,
                ))),
            )
            .col_expr(monthly_ledgers::Column::UpdatedAt, Expr::value(now_tz()))
            .filter(monthly_ledgers::Column::Id.eq(row.id))
            .filter(monthly_ledgers::Column::Status.eq(DbLedgerStatus::Closed))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(PeriodError::StatusChanged);
        }

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::ReconcileLedger,
            "monthly_ledger",
            row.id,
            serde_json::json!({ "church_id": church_id, "month": month, "year": year }),
        );
        insert_audit(&txn, &audit).await?;

        let reconciled = monthly_ledgers::Entity::find_by_id(row.id)
            .one(&txn)
            .await?
            .ok_or(PeriodError::StatusChanged)?;

        txn.commit().await?;

        tracing::info!(church = %church_id, month, year, "ledger period reconciled");

        Ok(reconciled)
    }

    /// Fetches one ledger period.
    ///
    /// # Errors
    ///
    /// Returns an error if no ledger exists for the period.
    pub async fn get_ledger(
        &self,
        church_id: ChurchId,
        month: u32,
        year: i32,
    ) -> Result<monthly_ledgers::Model, PeriodError> {
        let row = monthly_ledgers::Entity::find()
            .filter(monthly_ledgers::Column::ChurchId.eq(church_id.into_inner()))
            .filter(monthly_ledgers::Column::Month.eq(month_column(month)))
            .filter(monthly_ledgers::Column::Year.eq(year))
            .one(&self.db)
            .await?
            .ok_or(PeriodError::LedgerNotFound {
                church_id,
                month,
                year,
            })?;
        Ok(row)
    }

    /// Lists ledgers matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_ledgers(
        &self,
        filter: LedgerFilter,
    ) -> Result<Vec<monthly_ledgers::Model>, PeriodError> {
        let mut query = monthly_ledgers::Entity::find();
        if let Some(church_id) = filter.church_id {
            query = query.filter(monthly_ledgers::Column::ChurchId.eq(church_id.into_inner()));
        }
        if let Some(year) = filter.year {
            query = query.filter(monthly_ledgers::Column::Year.eq(year));
        }
        if let Some(month) = filter.month {
            query = query.filter(monthly_ledgers::Column::Month.eq(month_column(month)));
        }
        if let Some(status) = filter.status {
            query = query.filter(monthly_ledgers::Column::Status.eq(DbLedgerStatus::from(status)));
        }
        let rows = query
            .order_by_desc(monthly_ledgers::Column::Year)
            .order_by_desc(monthly_ledgers::Column::Month)
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}

async fn find_ledger(
    txn: &DatabaseTransaction,
    church_id: ChurchId,
    month: u32,
    year: i32,
) -> Result<Option<monthly_ledgers::Model>, DbErr> {
    monthly_ledgers::Entity::find()
        .filter(monthly_ledgers::Column::ChurchId.eq(church_id.into_inner()))
        .filter(monthly_ledgers::Column::Month.eq(month_column(month)))
        .filter(monthly_ledgers::Column::Year.eq(year))
        .one(txn)
        .await
}

/// Sums `total_income` over the period's approved reports.
async fn approved_report_income(
    txn: &DatabaseTransaction,
    church_id: ChurchId,
    month: u32,
    year: i32,
) -> Result<Decimal, DbErr> {
    let reports = monthly_reports::Entity::find()
        .filter(monthly_reports::Column::ChurchId.eq(church_id.into_inner()))
        .filter(monthly_reports::Column::Month.eq(month_column(month)))
        .filter(monthly_reports::Column::Year.eq(year))
        .filter(monthly_reports::Column::Status.eq(DbReportStatus::Approved))
        .all(txn)
        .await?;
    Ok(reports.iter().map(|r| r.total_income).sum())
}

/// Sums expense record amounts dated inside the period.
async fn period_expense_total(
    txn: &DatabaseTransaction,
    church_id: ChurchId,
    month: u32,
    year: i32,
) -> Result<Decimal, DbErr> {
    let Some((start, end)) = month_bounds(year, month) else {
        return Ok(Decimal::ZERO);
    };
    let expenses = expense_records::Entity::find()
        .filter(expense_records::Column::ChurchId.eq(church_id.into_inner()))
        .filter(expense_records::Column::ExpenseDate.gte(start))
        .filter(expense_records::Column::ExpenseDate.lt(end))
        .all(txn)
        .await?;
    Ok(expenses.iter().map(|e| e.amount).sum())
}

/// Converts a stored ledger row to the domain type.
#[must_use]
pub(crate) fn model_to_domain(row: &monthly_ledgers::Model) -> MonthlyLedger {
    MonthlyLedger {
        id: LedgerId::from_uuid(row.id),
        church_id: ChurchId::from_uuid(row.church_id),
        month: row.month.unsigned_abs(),
        year: row.year,
        opening_balance: row.opening_balance,
        closing_balance: row.closing_balance,
        total_income: row.total_income,
        total_expenses: row.total_expenses,
        status: LedgerStatus::from(row.status),
        closed_by: row.closed_by.map(UserId::from_uuid),
        closed_at: row.closed_at.map(Into::into),
        notes: row.notes.clone(),
    }
}

fn now_tz() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ledger_row(status: DbLedgerStatus) -> monthly_ledgers::Model {
        let now = now_tz();
        monthly_ledgers::Model {
            id: Uuid::now_v7(),
            church_id: Uuid::now_v7(),
            month: 3,
            year: 2025,
            opening_balance: dec!(200000),
            closing_balance: dec!(350000),
            total_income: dec!(500000),
            total_expenses: dec!(350000),
            status,
            notes: Some("cierre de marzo".to_string()),
            closed_by: None,
            closed_at: None,
            reconciled_by: None,
            reconciled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_domain_round_trips_fields() {
        let row = ledger_row(DbLedgerStatus::Closed);
        let domain = model_to_domain(&row);

        assert_eq!(domain.id.into_inner(), row.id);
        assert_eq!(domain.month, 3);
        assert_eq!(domain.year, 2025);
        assert_eq!(domain.opening_balance, dec!(200000));
        assert_eq!(domain.status, LedgerStatus::Closed);
        assert_eq!(domain.notes.as_deref(), Some("cierre de marzo"));
    }

    #[test]
    fn test_close_validation_uses_domain_status() {
        let row = ledger_row(DbLedgerStatus::Closed);
        let domain = model_to_domain(&row);

        let result = PeriodService::close(
            &domain,
            dec!(100),
            dec!(50),
            tesoreria_shared::types::UserId::new(),
            None,
        );
        assert!(matches!(
            result,
            Err(LifecycleError::NotOpen(LedgerStatus::Closed))
        ));
    }
}
