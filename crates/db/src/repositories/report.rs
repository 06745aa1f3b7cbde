//! Report repository for the monthly report workflow.
//!
//! Approval is the interesting path: the status flip, the income
//! recognition line, the balanced allocation batch, the balance deltas,
//! and the audit row all commit or roll back together.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use tesoreria_core::allocation::{
    AllocationConfig, AllocationResult, DesignatedLine, ExpenseLine, ExpenseLines, IncomeLines,
};
use tesoreria_core::audit::{AuditAction, AuditEvent};
use tesoreria_core::auth::Actor;
use tesoreria_core::ledger::{resolve_deltas, validate_batch};
use tesoreria_core::report::{
    DepositInfo, MonthlyReport, ReportAction, ReportError as ReportWorkflowError, ReportStatus,
    ReportWorkflow,
};
use tesoreria_shared::error::AppError;
use tesoreria_shared::types::{ChurchId, FundId, ReportId, UserId};

use crate::entities::{
    churches, monthly_reports, sea_orm_active_enums::ReportStatus as DbReportStatus,
};

use super::journal::{apply_fund_deltas, insert_entries, JournalError};
use super::{insert_audit, month_column};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Report not found.
    #[error("Report not found: {0}")]
    NotFound(Uuid),

    /// Church not found.
    #[error("Church not found: {0}")]
    ChurchNotFound(Uuid),

    /// A workflow rule was violated.
    #[error(transparent)]
    Workflow(#[from] ReportWorkflowError),

    /// Posting the approval entries failed.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// A stored JSON payload failed to deserialize.
    #[error("Stored report payload is invalid: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The report's status changed under us; the transition lost a race.
    #[error("Report status changed concurrently, please retry")]
    StatusChanged,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NotFound(_) | ReportError::ChurchNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            ReportError::Workflow(e) => e.into(),
            ReportError::Journal(e) => e.into(),
            ReportError::InvalidPayload(_) | ReportError::Database(_) => {
                Self::Database(err.to_string())
            }
            ReportError::StatusChanged => Self::Conflict(err.to_string()),
        }
    }
}

/// Input for creating a monthly report.
#[derive(Debug, Clone)]
pub struct CreateReportInput {
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
}

/// Report repository for the monthly report workflow.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft report with its allocation computed eagerly.
    ///
    /// # Errors
    ///
    /// Returns an error for a duplicate period, a missing church, an
    /// actor outside the church's scope, or invalid line amounts.
    pub async fn create_report(
        &self,
        actor: &Actor,
        input: CreateReportInput,
        config: &AllocationConfig,
    ) -> Result<monthly_reports::Model, ReportError> {
        let txn = self.db.begin().await?;

        churches::Entity::find_by_id(input.church_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(ReportError::ChurchNotFound(input.church_id.into_inner()))?;

        let already_exists = monthly_reports::Entity::find()
            .filter(monthly_reports::Column::ChurchId.eq(input.church_id.into_inner()))
            .filter(monthly_reports::Column::Month.eq(month_column(input.month)))
            .filter(monthly_reports::Column::Year.eq(input.year))
            .one(&txn)
            .await?
            .is_some();

        let report = ReportWorkflow::create(
            actor,
            input.church_id,
            input.month,
            input.year,
            input.income,
            input.expenses,
            input.deposit,
            config,
            already_exists,
        )?;

        let row = insert_report(&txn, &report).await?;

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::CreateReport,
            "monthly_report",
            row.id,
            serde_json::json!({
                "church_id": report.church_id,
                "month": report.month,
                "year": report.year,
                "total_income": report.allocation.total_income,
            }),
        );
        insert_audit(&txn, &audit).await?;

        txn.commit().await?;

        tracing::info!(
            church = %report.church_id,
            month = report.month,
            year = report.year,
            "monthly report created"
        );

        Ok(row)
    }

    /// Submits a draft report for approval.
    ///
    /// # Errors
    ///
    /// Returns an error unless the report is a draft and the actor is
    /// scoped to the report's church.
    pub async fn submit_report(
        &self,
        actor: &Actor,
        report_id: ReportId,
    ) -> Result<monthly_reports::Model, ReportError> {
        let txn = self.db.begin().await?;

        let row = find_report(&txn, report_id).await?;
        let report = report_to_domain(&row)?;

        let ReportAction::Submit {
            submitted_by,
            submitted_at,
            ..
        } = ReportWorkflow::submit(&report, actor)?
        else {
            return Err(ReportError::StatusChanged);
        };

        let updated = monthly_reports::Entity::update_many()
            .col_expr(
                monthly_reports::Column::Status,
                Expr::value(DbReportStatus::Submitted),
            )
            .col_expr(
                monthly_reports::Column::SubmittedBy,
                Expr::value(Some(submitted_by.into_inner())),
            )
            .col_expr(
                monthly_reports::Column::SubmittedAt,
                Expr::value(Some(sea_orm::prelude::DateTimeWithTimeZone::from(
                    submitted_at,
                ))),
            )
            .col_expr(monthly_reports::Column::UpdatedAt, Expr::value(now_tz()))
            .filter(monthly_reports::Column::Id.eq(row.id))
            .filter(monthly_reports::Column::Status.eq(DbReportStatus::Draft))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(ReportError::StatusChanged);
        }

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::SubmitReport,
            "monthly_report",
            row.id,
            serde_json::json!({ "church_id": report.church_id }),
        );
        insert_audit(&txn, &audit).await?;

        let refreshed = find_report(&txn, report_id).await?;
        txn.commit().await?;
        Ok(refreshed)
    }

    /// Approves a submitted report and posts its journal entries.
    ///
    /// Writes, in one transaction: the income recognition credit to the
    /// church's general fund, the balanced allocation batch moving the
    /// national percentage and designated amounts out of it, the balance
    /// deltas for every touched fund, the status flip, and the audit row.
    ///
    /// # Errors
    ///
    /// Returns an error unless the report is submitted and the actor holds
    /// a national approval role outside the submitting church, or if any
    /// posting step fails.
    pub async fn approve_report(
        &self,
        actor: &Actor,
        report_id: ReportId,
        general_fund: FundId,
        national_fund: FundId,
    ) -> Result<monthly_reports::Model, ReportError> {
        let txn = self.db.begin().await?;

        let row = find_report(&txn, report_id).await?;
        let report = report_to_domain(&row)?;

        let ReportAction::Approve {
            approved_by,
            approved_at,
            income_entry,
            allocation_entries,
            ..
        } = ReportWorkflow::approve(&report, actor, general_fund, national_fund)?
        else {
            return Err(ReportError::StatusChanged);
        };

        if !allocation_entries.is_empty() {
            validate_batch(&allocation_entries).map_err(JournalError::from)?;
        }

        // Income first: the allocation batch debits the general fund the
        // income credit just funded.
        let mut entries = vec![income_entry];
        entries.extend(allocation_entries);
        let deltas = resolve_deltas(&entries);

        apply_fund_deltas(&txn, Some(report.church_id), &deltas, false).await?;
        insert_entries(&txn, Some(report.church_id), actor.user_id, &entries)
            .await
            .map_err(JournalError::from)?;

        let updated = monthly_reports::Entity::update_many()
            .col_expr(
                monthly_reports::Column::Status,
                Expr::value(DbReportStatus::Approved),
            )
            .col_expr(
                monthly_reports::Column::ApprovedBy,
                Expr::value(Some(approved_by.into_inner())),
            )
            .col_expr(
                monthly_reports::Column::ApprovedAt,
                Expr::value(Some(sea_orm::prelude::DateTimeWithTimeZone::from(
                    approved_at,
                ))),
            )
            .col_expr(monthly_reports::Column::UpdatedAt, Expr::value(now_tz()))
            .filter(monthly_reports::Column::Id.eq(row.id))
            .filter(monthly_reports::Column::Status.eq(DbReportStatus::Submitted))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(ReportError::StatusChanged);
        }

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::ApproveReport,
            "monthly_report",
            row.id,
            serde_json::json!({
                "church_id": report.church_id,
                "total_income": report.allocation.total_income,
                "national_fund": report.allocation.national_fund,
                "designated_total": report.allocation.designated_total,
                "lines": entries.len(),
            }),
        );
        insert_audit(&txn, &audit).await?;

        let refreshed = find_report(&txn, report_id).await?;
        txn.commit().await?;

        tracing::info!(
            church = %report.church_id,
            report = %report_id,
            national_fund = %report.allocation.national_fund,
            "monthly report approved"
        );

        Ok(refreshed)
    }

    /// Rejects a submitted report with a mandatory reason.
    ///
    /// # Errors
    ///
    /// Returns an error unless the report is submitted, the actor holds an
    /// approval role, and the reason is non-empty.
    pub async fn reject_report(
        &self,
        actor: &Actor,
        report_id: ReportId,
        reason: String,
    ) -> Result<monthly_reports::Model, ReportError> {
        let txn = self.db.begin().await?;

        let row = find_report(&txn, report_id).await?;
        let report = report_to_domain(&row)?;

        let ReportAction::Reject { reason, .. } = ReportWorkflow::reject(&report, actor, reason)?
        else {
            return Err(ReportError::StatusChanged);
        };

        let updated = monthly_reports::Entity::update_many()
            .col_expr(
                monthly_reports::Column::Status,
                Expr::value(DbReportStatus::Rejected),
            )
            .col_expr(
                monthly_reports::Column::RejectionReason,
                Expr::value(Some(reason.clone())),
            )
            .col_expr(monthly_reports::Column::UpdatedAt, Expr::value(now_tz()))
            .filter(monthly_reports::Column::Id.eq(row.id))
            .filter(monthly_reports::Column::Status.eq(DbReportStatus::Submitted))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(ReportError::StatusChanged);
        }

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::RejectReport,
            "monthly_report",
            row.id,
            serde_json::json!({ "church_id": report.church_id, "reason": reason }),
        );
        insert_audit(&txn, &audit).await?;

        let refreshed = find_report(&txn, report_id).await?;
        txn.commit().await?;
        Ok(refreshed)
    }

    /// Reopens a rejected report for editing and resubmission.
    ///
    /// # Errors
    ///
    /// Returns an error unless the report is rejected and the actor is
    /// scoped to the report's church.
    pub async fn reopen_report(
        &self,
        actor: &Actor,
        report_id: ReportId,
    ) -> Result<monthly_reports::Model, ReportError> {
        let txn = self.db.begin().await?;

        let row = find_report(&txn, report_id).await?;
        let report = report_to_domain(&row)?;

        let ReportAction::Reopen { .. } = ReportWorkflow::reopen(&report, actor)? else {
            return Err(ReportError::StatusChanged);
        };

        let updated = monthly_reports::Entity::update_many()
            .col_expr(
                monthly_reports::Column::Status,
                Expr::value(DbReportStatus::Draft),
            )
            .col_expr(
                monthly_reports::Column::RejectionReason,
                Expr::value(None::<String>),
            )
            .col_expr(monthly_reports::Column::UpdatedAt, Expr::value(now_tz()))
            .filter(monthly_reports::Column::Id.eq(row.id))
            .filter(monthly_reports::Column::Status.eq(DbReportStatus::Rejected))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(ReportError::StatusChanged);
        }

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::ReopenReport,
            "monthly_report",
            row.id,
            serde_json::json!({ "church_id": report.church_id }),
        );
        insert_audit(&txn, &audit).await?;

        let refreshed = find_report(&txn, report_id).await?;
        txn.commit().await?;
        Ok(refreshed)
    }

    /// Fetches one report by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if no report exists with this ID.
    pub async fn get_report(
        &self,
        report_id: ReportId,
    ) -> Result<monthly_reports::Model, ReportError> {
        let row = monthly_reports::Entity::find_by_id(report_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ReportError::NotFound(report_id.into_inner()))?;
        Ok(row)
    }

    /// Lists a church's reports, newest first, optionally for one year.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_reports(
        &self,
        church_id: ChurchId,
        year: Option<i32>,
    ) -> Result<Vec<monthly_reports::Model>, ReportError> {
        let mut query = monthly_reports::Entity::find()
            .filter(monthly_reports::Column::ChurchId.eq(church_id.into_inner()));
        if let Some(year) = year {
            query = query.filter(monthly_reports::Column::Year.eq(year));
        }
        let rows = query
            .order_by_desc(monthly_reports::Column::Year)
            .order_by_desc(monthly_reports::Column::Month)
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}

async fn find_report(
    txn: &DatabaseTransaction,
    report_id: ReportId,
) -> Result<monthly_reports::Model, ReportError> {
    monthly_reports::Entity::find_by_id(report_id.into_inner())
        .one(txn)
        .await?
        .ok_or(ReportError::NotFound(report_id.into_inner()))
}

async fn insert_report(
    txn: &DatabaseTransaction,
    report: &MonthlyReport,
) -> Result<monthly_reports::Model, ReportError> {
    let now = now_tz();
    let row = monthly_reports::ActiveModel {
        id: Set(report.id.into_inner()),
        church_id: Set(report.church_id.into_inner()),
        month: Set(month_column(report.month)),
        year: Set(report.year),
        tithes: Set(report.income.tithes),
        offerings: Set(report.income.offerings),
        other_income: Set(report.income.other),
        designated: Set(serde_json::to_value(&report.income.designated)?),
        operating_expenses: Set(serde_json::to_value(&report.expenses.operating)?),
        national_fund: Set(report.allocation.national_fund),
        designated_total: Set(report.allocation.designated_total),
        total_income: Set(report.allocation.total_income),
        total_operating_expenses: Set(report.allocation.total_operating_expenses),
        pastoral_honorarium: Set(report.allocation.pastoral_honorarium),
        deficit: Set(report.allocation.deficit),
        allocation_version: Set(version_column(report.allocation.config_version)),
        bank_receipt_number: Set(report.deposit.receipt_number.clone()),
        bank_deposit_date: Set(report.deposit.deposit_date),
        status: Set(DbReportStatus::from(report.status)),
        rejection_reason: Set(None),
        created_by: Set(report.created_by.into_inner()),
        created_at: Set(report.created_at.into()),
        submitted_by: Set(None),
        submitted_at: Set(None),
        approved_by: Set(None),
        approved_at: Set(None),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;
    Ok(row)
}

/// Rebuilds the domain report from a stored row.
///
/// # Errors
///
/// Returns an error if a stored JSON payload fails to deserialize.
pub(crate) fn report_to_domain(
    row: &monthly_reports::Model,
) -> Result<MonthlyReport, serde_json::Error> {
    let designated: Vec<DesignatedLine> = serde_json::from_value(row.designated.clone())?;
    let operating: Vec<ExpenseLine> = serde_json::from_value(row.operating_expenses.clone())?;

    Ok(MonthlyReport {
        id: ReportId::from_uuid(row.id),
        church_id: ChurchId::from_uuid(row.church_id),
        month: row.month.unsigned_abs(),
        year: row.year,
        income: IncomeLines {
            tithes: row.tithes,
            offerings: row.offerings,
            other: row.other_income,
            designated,
        },
        expenses: ExpenseLines { operating },
        deposit: DepositInfo {
            receipt_number: row.bank_receipt_number.clone(),
            deposit_date: row.bank_deposit_date,
        },
        allocation: AllocationResult {
            national_fund: row.national_fund,
            designated_total: row.designated_total,
            total_income: row.total_income,
            total_operating_expenses: row.total_operating_expenses,
            pastoral_honorarium: row.pastoral_honorarium,
            deficit: row.deficit,
            config_version: row.allocation_version.unsigned_abs(),
        },
        status: ReportStatus::from(row.status),
        created_by: UserId::from_uuid(row.created_by),
        created_at: row.created_at.into(),
        submitted_by: row.submitted_by.map(UserId::from_uuid),
        submitted_at: row.submitted_at.map(Into::into),
        approved_by: row.approved_by.map(UserId::from_uuid),
        approved_at: row.approved_at.map(Into::into),
        rejection_reason: row.rejection_reason.clone(),
    })
}

fn version_column(version: u32) -> i32 {
    i32::try_from(version).unwrap_or(i32::MAX)
}

fn now_tz() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn report_row(status: DbReportStatus) -> monthly_reports::Model {
        let now = now_tz();
        monthly_reports::Model {
            id: Uuid::now_v7(),
            church_id: Uuid::now_v7(),
            month: 1,
            year: 2025,
            tithes: dec!(1000000),
            offerings: dec!(500000),
            other_income: dec!(0),
            designated: serde_json::json!([
                { "fund_id": Uuid::now_v7(), "description": "Misiones", "amount": "200000" }
            ]),
            operating_expenses: serde_json::json!([
                { "description": "Luz", "category": "servicios", "amount": "150000" }
            ]),
            national_fund: dec!(150000),
            designated_total: dec!(200000),
            total_income: dec!(1700000),
            total_operating_expenses: dec!(150000),
            pastoral_honorarium: dec!(1200000),
            deficit: dec!(0),
            allocation_version: 1,
            bank_receipt_number: Some("B-1234".to_string()),
            bank_deposit_date: chrono::NaiveDate::from_ymd_opt(2025, 2, 3),
            status,
            rejection_reason: None,
            created_by: Uuid::now_v7(),
            created_at: now,
            submitted_by: None,
            submitted_at: None,
            approved_by: None,
            approved_at: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_report_to_domain_rebuilds_lines() {
        let row = report_row(DbReportStatus::Draft);
        let report = report_to_domain(&row).unwrap();

        assert_eq!(report.month, 1);
        assert_eq!(report.income.tithes, dec!(1000000));
        assert_eq!(report.income.designated.len(), 1);
        assert_eq!(report.income.designated[0].amount, dec!(200000));
        assert_eq!(report.expenses.operating[0].category, "servicios");
        assert_eq!(report.allocation.national_fund, dec!(150000));
        assert_eq!(report.deposit.receipt_number.as_deref(), Some("B-1234"));
        assert_eq!(report.status, ReportStatus::Draft);
    }

    #[test]
    fn test_report_to_domain_rejects_corrupt_payload() {
        let mut row = report_row(DbReportStatus::Draft);
        row.designated = serde_json::json!({ "not": "an array" });
        assert!(report_to_domain(&row).is_err());
    }

    #[test]
    fn test_domain_status_drives_workflow_checks() {
        let row = report_row(DbReportStatus::Approved);
        let report = report_to_domain(&row).unwrap();

        let actor = Actor {
            user_id: UserId::new(),
            role: tesoreria_core::auth::Role::ChurchPastor,
            church_id: Some(report.church_id),
        };
        let result = ReportWorkflow::submit(&report, &actor);
        assert!(matches!(
            result,
            Err(ReportWorkflowError::InvalidTransition { .. })
        ));
    }
}
