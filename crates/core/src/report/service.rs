//! Stateless report workflow transitions.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tesoreria_shared::error::AppError;
use tesoreria_shared::types::{ChurchId, FundId, ReportId};
use thiserror::Error;

use crate::allocation::{allocate, AllocationConfig, AllocationError, ExpenseLines, IncomeLines};
use crate::auth::{Actor, AuthError};
use crate::ledger::{EntryInput, EntryReference};
use crate::period::service::{validate_period, PeriodError};

use super::types::{DepositInfo, MonthlyReport, ReportAction, ReportStatus};

/// Errors for report workflow operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// A report already exists for this (church, year, month).
    #[error("Report already exists for church {church_id}, {month}/{year}")]
    AlreadyExists {
        /// The church.
        church_id: ChurchId,
        /// Month of the duplicate.
        month: u32,
        /// Year of the duplicate.
        year: i32,
    },

    /// The transition is not valid from the current status.
    #[error("Invalid transition: report is {from}, cannot move to {to}")]
    InvalidTransition {
        /// Current status.
        from: ReportStatus,
        /// Attempted target status.
        to: ReportStatus,
    },

    /// Rejection requires a non-empty reason.
    #[error("A rejection reason is required")]
    RejectionReasonRequired,

    /// Authorization failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Allocation input validation failure.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Period validation failure.
    #[error(transparent)]
    Period(#[from] PeriodError),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::AlreadyExists { .. } | ReportError::InvalidTransition { .. } => {
                Self::Conflict(err.to_string())
            }
            ReportError::RejectionReasonRequired | ReportError::Allocation(_) => {
                Self::Validation(err.to_string())
            }
            ReportError::Auth(e) => Self::Authorization(e.to_string()),
            ReportError::Period(e) => e.into(),
        }
    }
}

/// Last day of a (year, month) period; entry dates for generated lines.
#[must_use]
pub(crate) fn period_end(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    // Safe for any validated period: day 1 always exists.
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or(NaiveDate::MAX)
        .pred_opt()
        .unwrap_or(NaiveDate::MAX)
}

/// Stateless service for the monthly report state machine.
pub struct ReportWorkflow;

impl ReportWorkflow {
    /// Creates a draft report, computing derived totals eagerly.
    ///
    /// The allocation result is stored with the report and reused at
    /// approval; it is not recomputed there. No journal entries are
    /// written at creation.
    ///
    /// # Errors
    ///
    /// Returns an error for a duplicate period, an actor outside the
    /// church's scope, a bad (month, year), or invalid line amounts.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        actor: &Actor,
        church_id: ChurchId,
        month: u32,
        year: i32,
        income: IncomeLines,
        expenses: ExpenseLines,
        deposit: DepositInfo,
        config: &AllocationConfig,
        already_exists: bool,
    ) -> Result<MonthlyReport, ReportError> {
        actor.authorize_church(church_id)?;
        validate_period(month, year)?;
        if already_exists {
            return Err(ReportError::AlreadyExists {
                church_id,
                month,
                year,
            });
        }

        let allocation = allocate(&income, &expenses, config)?;

        Ok(MonthlyReport {
            id: ReportId::new(),
            church_id,
            month,
            year,
            income,
            expenses,
            deposit,
            allocation,
            status: ReportStatus::Draft,
            created_by: actor.user_id,
            created_at: Utc::now(),
            submitted_by: None,
            submitted_at: None,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
        })
    }

    /// Submits a draft report. Only the owning church's actor may submit.
    ///
    /// # Errors
    ///
    /// Returns an error unless the report is a draft and the actor is
    /// scoped to the report's church.
    pub fn submit(report: &MonthlyReport, actor: &Actor) -> Result<ReportAction, ReportError> {
        actor.authorize_church(report.church_id)?;
        if report.status != ReportStatus::Draft {
            return Err(ReportError::InvalidTransition {
                from: report.status,
                to: ReportStatus::Submitted,
            });
        }

        Ok(ReportAction::Submit {
            new_status: ReportStatus::Submitted,
            submitted_by: actor.user_id,
            submitted_at: Utc::now(),
        })
    }

    /// Approves a submitted report and builds its journal entries.
    ///
    /// Two journal writes are generated, executed by the persistence layer
    /// in one atomic transaction with the status change:
    /// 1. income recognition: a single credit line to the church's general
    ///    fund for the period's total income (exempt from the batch
    ///    balance check, like the expense wrapper);
    /// 2. a balanced allocation batch debiting the general fund and
    ///    crediting the national fund and each designated fund.
    ///
    /// # Errors
    ///
    /// Returns an error unless the report is submitted and the actor holds
    /// a national approval role outside the submitting church.
    pub fn approve(
        report: &MonthlyReport,
        actor: &Actor,
        general_fund: FundId,
        national_fund: FundId,
    ) -> Result<ReportAction, ReportError> {
        actor.authorize_report_approval(report.church_id)?;
        if report.status != ReportStatus::Submitted {
            return Err(ReportError::InvalidTransition {
                from: report.status,
                to: ReportStatus::Approved,
            });
        }

        let date = period_end(report.year, report.month);
        let reference = Some(EntryReference::Report(report.id));
        let allocation = &report.allocation;

        let income_entry = EntryInput {
            fund_id: general_fund,
            date,
            debit: Decimal::ZERO,
            credit: allocation.total_income,
            description: format!("Ingresos {}/{}", report.month, report.year),
            reference,
        };

        let mut allocation_entries = Vec::new();
        if allocation.national_fund > Decimal::ZERO {
            allocation_entries.push(EntryInput {
                fund_id: general_fund,
                date,
                debit: allocation.national_fund,
                credit: Decimal::ZERO,
                description: format!("Fondo nacional {}/{}", report.month, report.year),
                reference,
            });
            allocation_entries.push(EntryInput {
                fund_id: national_fund,
                date,
                debit: Decimal::ZERO,
                credit: allocation.national_fund,
                description: format!("Fondo nacional {}/{}", report.month, report.year),
                reference,
            });
        }
        for line in &report.income.designated {
            if line.amount.is_zero() {
                continue;
            }
            allocation_entries.push(EntryInput {
                fund_id: general_fund,
                date,
                debit: line.amount,
                credit: Decimal::ZERO,
                description: line.description.clone(),
                reference,
            });
            allocation_entries.push(EntryInput {
                fund_id: line.fund_id,
                date,
                debit: Decimal::ZERO,
                credit: line.amount,
                description: line.description.clone(),
                reference,
            });
        }

        Ok(ReportAction::Approve {
            new_status: ReportStatus::Approved,
            approved_by: actor.user_id,
            approved_at: Utc::now(),
            income_entry,
            allocation_entries,
        })
    }

    /// Rejects a submitted report with a mandatory reason.
    ///
    /// # Errors
    ///
    /// Returns an error unless the report is submitted, the actor holds an
    /// approval role, and the reason is non-empty.
    pub fn reject(
        report: &MonthlyReport,
        actor: &Actor,
        reason: String,
    ) -> Result<ReportAction, ReportError> {
        actor.authorize_report_approval(report.church_id)?;
        if reason.trim().is_empty() {
            return Err(ReportError::RejectionReasonRequired);
        }
        if report.status != ReportStatus::Submitted {
            return Err(ReportError::InvalidTransition {
                from: report.status,
                to: ReportStatus::Rejected,
            });
        }

        Ok(ReportAction::Reject {
            new_status: ReportStatus::Rejected,
            reason,
        })
    }

    /// Reopens a rejected report so the owning church can fix and
    /// resubmit it.
    ///
    /// # Errors
    ///
    /// Returns an error unless the report is rejected and the actor is
    /// scoped to the report's church.
    pub fn reopen(report: &MonthlyReport, actor: &Actor) -> Result<ReportAction, ReportError> {
        actor.authorize_church(report.church_id)?;
        if report.status != ReportStatus::Rejected {
            return Err(ReportError::InvalidTransition {
                from: report.status,
                to: ReportStatus::Draft,
            });
        }

        Ok(ReportAction::Reopen {
            new_status: ReportStatus::Draft,
        })
    }
}
