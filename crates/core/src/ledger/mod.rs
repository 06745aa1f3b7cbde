//! Double-entry journal validation and fund balance rules.
//!
//! This module implements the bookkeeping core:
//! - Journal entry inputs (debits and credits against funds)
//! - Batch balance validation (total debits == total credits)
//! - Net balance-delta resolution per fund
//! - The non-negative fund balance rule
//! - Error types for journal operations
//!
//! Entries are append-only. There is no update or delete anywhere in this
//! API; corrections are reversing entries in a later batch.

pub mod balance;
pub mod entry;
pub mod error;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use balance::{apply_delta, FundDelta};
pub use entry::{EntryInput, EntryReference};
pub use error::LedgerError;
pub use validation::{resolve_deltas, validate_batch, validate_expense_entry};
