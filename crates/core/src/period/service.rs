//! Stateless period lifecycle transitions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tesoreria_shared::error::AppError;
use tesoreria_shared::types::{ChurchId, LedgerId, UserId};
use thiserror::Error;

use super::types::{LedgerStatus, MonthlyLedger};

/// Errors for period lifecycle operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    /// Month outside 1-12.
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    /// Year outside the tracked range.
    #[error("Year {0} is out of range")]
    InvalidYear(i32),

    /// A ledger already exists for this (church, month, year).
    #[error("Ledger already exists for church {church_id}, {month}/{year}")]
    AlreadyExists {
        /// The church.
        church_id: ChurchId,
        /// Month of the duplicate.
        month: u32,
        /// Year of the duplicate.
        year: i32,
    },

    /// The operation requires an open ledger.
    #[error("Ledger is {0}, expected open")]
    NotOpen(LedgerStatus),

    /// Reconciling requires a closed ledger.
    #[error("Ledger is {0}, expected closed")]
    NotClosed(LedgerStatus),
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::InvalidMonth(_) | PeriodError::InvalidYear(_) => {
                Self::Validation(err.to_string())
            }
            PeriodError::AlreadyExists { .. }
            | PeriodError::NotOpen(_)
            | PeriodError::NotClosed(_) => Self::Conflict(err.to_string()),
        }
    }
}

/// Validates a (month, year) pair.
///
/// # Errors
///
/// Returns an error for a month outside 1-12 or a year outside 2000-2100.
pub fn validate_period(month: u32, year: i32) -> Result<(), PeriodError> {
    if !(1..=12).contains(&month) {
        return Err(PeriodError::InvalidMonth(month));
    }
    if !(2000..=2100).contains(&year) {
        return Err(PeriodError::InvalidYear(year));
    }
    Ok(())
}

/// The close transition's output, carrying the computed totals and stamps
/// the persistence layer writes atomically.
#[derive(Debug, Clone)]
pub struct CloseAction {
    /// Always [`LedgerStatus::Closed`].
    pub new_status: LedgerStatus,
    /// Income aggregated from approved reports.
    pub total_income: Decimal,
    /// Expenses aggregated from dated expense records.
    pub total_expenses: Decimal,
    /// Computed closing balance.
    pub closing_balance: Decimal,
    /// Who closed the period.
    pub closed_by: UserId,
    /// When the period was closed.
    pub closed_at: DateTime<Utc>,
    /// Free-form close notes.
    pub notes: Option<String>,
}

/// The reconcile transition's output.
#[derive(Debug, Clone)]
pub struct ReconcileAction {
    /// Always [`LedgerStatus::Reconciled`].
    pub new_status: LedgerStatus,
    /// Who marked the period reconciled.
    pub reconciled_by: UserId,
    /// When the period was marked reconciled.
    pub reconciled_at: DateTime<Utc>,
}

/// Stateless service owning the monthly ledger lifecycle.
pub struct PeriodService;

impl PeriodService {
    /// Opens a new ledger period for a church.
    ///
    /// The opening balance carries forward the prior month's closing
    /// balance (`None` for a church's first tracked period). With no
    /// activity yet, the closing balance starts equal to the opening
    /// balance.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::AlreadyExists`] if a ledger exists for this
    /// (church, month, year), or a validation error for a bad period.
    pub fn open(
        church_id: ChurchId,
        month: u32,
        year: i32,
        already_exists: bool,
        prior_closing: Option<Decimal>,
    ) -> Result<MonthlyLedger, PeriodError> {
        validate_period(month, year)?;
        if already_exists {
            return Err(PeriodError::AlreadyExists {
                church_id,
                month,
                year,
            });
        }

        let opening_balance = prior_closing.unwrap_or(Decimal::ZERO);
        Ok(MonthlyLedger {
            id: LedgerId::new(),
            church_id,
            month,
            year,
            opening_balance,
            closing_balance: opening_balance,
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            status: LedgerStatus::Open,
            closed_by: None,
            closed_at: None,
            notes: None,
        })
    }

    /// Closes an open ledger, computing the locked closing balance.
    ///
    /// `closing_balance = opening_balance + total_income - total_expenses`.
    /// The aggregates are supplied by the persistence layer, which sums
    /// approved reports and dated expense records for the period inside
    /// the same transaction that re-validates the status.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::NotOpen`] unless the ledger is open; a
    /// re-close attempt on a closed ledger therefore always fails.
    pub fn close(
        ledger: &MonthlyLedger,
        total_income: Decimal,
        total_expenses: Decimal,
        closed_by: UserId,
        notes: Option<String>,
    ) -> Result<CloseAction, PeriodError> {
        if ledger.status != LedgerStatus::Open {
            return Err(PeriodError::NotOpen(ledger.status));
        }

        Ok(CloseAction {
            new_status: LedgerStatus::Closed,
            total_income,
            total_expenses,
            closing_balance: ledger.opening_balance + total_income - total_expenses,
            closed_by,
            closed_at: Utc::now(),
            notes,
        })
    }

    /// Marks a closed ledger as reconciled. Terminal; mutates nothing but
    /// the status and stamps.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::NotClosed`] unless the ledger is closed.
    pub fn reconcile(
        ledger: &MonthlyLedger,
        reconciled_by: UserId,
    ) -> Result<ReconcileAction, PeriodError> {
        if ledger.status != LedgerStatus::Closed {
            return Err(PeriodError::NotClosed(ledger.status));
        }

        Ok(ReconcileAction {
            new_status: LedgerStatus::Reconciled,
            reconciled_by,
            reconciled_at: Utc::now(),
        })
    }
}
