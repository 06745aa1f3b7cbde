//! Error types for journal operations.

use rust_decimal::Decimal;
use tesoreria_shared::error::AppError;
use tesoreria_shared::types::{ChurchId, FundId};
use thiserror::Error;

/// Validation and integrity errors for journal operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// A batch must contain at least one entry.
    #[error("Journal batch must have at least one entry")]
    NoEntries,

    /// An entry amount is negative.
    #[error("Entry amounts must not be negative")]
    NegativeAmount,

    /// A single line carries both a debit and a credit.
    #[error("An entry must carry either a debit or a credit, not both")]
    DualSidedLine,

    /// Total debits and credits differ by more than the tolerance.
    #[error("Journal batch is unbalanced: debits ({debits}) != credits ({credits})")]
    Imbalanced {
        /// Total debit amount across the batch.
        debits: Decimal,
        /// Total credit amount across the batch.
        credits: Decimal,
    },

    /// An expense line must be debit-only with a positive amount.
    #[error("Expense entry must be a debit-only line with a positive amount")]
    InvalidExpenseEntry,

    /// Applying the delta would drive a fund balance below zero.
    #[error("Fund balance would go negative: current {current}, attempted delta {attempted_delta}")]
    NegativeBalance {
        /// Balance before the rejected mutation.
        current: Decimal,
        /// Delta that was rejected.
        attempted_delta: Decimal,
    },

    /// Referenced fund does not exist.
    #[error("Fund not found: {0}")]
    FundNotFound(FundId),

    /// Referenced church does not exist.
    #[error("Church not found: {0}")]
    ChurchNotFound(ChurchId),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Imbalanced { debits, credits } => Self::Imbalance { debits, credits },
            LedgerError::NegativeBalance {
                current,
                attempted_delta,
            } => Self::NegativeBalance {
                current,
                attempted_delta,
            },
            LedgerError::FundNotFound(_) | LedgerError::ChurchNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LedgerError::NoEntries
            | LedgerError::NegativeAmount
            | LedgerError::DualSidedLine
            | LedgerError::InvalidExpenseEntry => Self::Validation(err.to_string()),
        }
    }
}
