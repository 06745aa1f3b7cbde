//! Application-wide error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Financial-integrity errors (`Imbalance`, `NegativeBalance`) carry the
/// offending values so callers can correct and retry; they are never
/// downgraded to warnings.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input (negative amounts, out-of-range month, missing fields).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate period/report, re-closing a closed ledger, invalid re-approval.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Debit/credit mismatch in a journal batch.
    #[error("Journal batch is unbalanced: debits ({debits}) != credits ({credits})")]
    Imbalance {
        /// Total debit amount in the batch.
        debits: Decimal,
        /// Total credit amount in the batch.
        credits: Decimal,
    },

    /// A fund balance would go below zero.
    #[error("Fund balance would go negative: current {current}, attempted delta {attempted_delta}")]
    NegativeBalance {
        /// Balance before the rejected mutation.
        current: Decimal,
        /// Delta that was rejected.
        attempted_delta: Decimal,
    },

    /// Actor's role/scope does not permit the operation.
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Referenced church/fund/ledger/report/event does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code collaborators should map this error to.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Authorization(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Imbalance { .. } | Self::NegativeBalance { .. } => 422,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Imbalance { .. } => "IMBALANCE",
            Self::NegativeBalance { .. } => "NEGATIVE_BALANCE",
            Self::Authorization(_) => "AUTHORIZATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Authorization(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(
            AppError::Imbalance {
                debits: dec!(100),
                credits: dec!(90),
            }
            .status_code(),
            422
        );
        assert_eq!(
            AppError::NegativeBalance {
                current: dec!(50000),
                attempted_delta: dec!(-60000),
            }
            .status_code(),
            422
        );
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::Imbalance {
                debits: dec!(1),
                credits: dec!(2),
            }
            .error_code(),
            "IMBALANCE"
        );
        assert_eq!(
            AppError::NegativeBalance {
                current: dec!(0),
                attempted_delta: dec!(-1),
            }
            .error_code(),
            "NEGATIVE_BALANCE"
        );
        assert_eq!(
            AppError::Authorization(String::new()).error_code(),
            "AUTHORIZATION_ERROR"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_negative_balance_message_carries_values() {
        let err = AppError::NegativeBalance {
            current: dec!(50000),
            attempted_delta: dec!(-60000),
        };
        let msg = err.to_string();
        assert!(msg.contains("50000"));
        assert!(msg.contains("-60000"));
    }
}
