//! Monthly ledger lifecycle (open / close / reconcile).
//!
//! One ledger exists per (church, year, month). Opening carries forward the
//! prior month's closing balance; closing aggregates the period's income
//! and expenses and locks the record. A closed ledger is immutable;
//! corrections go through a later period, never a retroactive edit.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::{validate_period, CloseAction, PeriodError, PeriodService, ReconcileAction};
pub use types::{LedgerStatus, MonthlyLedger};
