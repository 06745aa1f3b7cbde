//! Monthly report approval workflow.
//!
//! A church's monthly report moves draft → submitted → approved/rejected.
//! Derived totals are computed eagerly at creation via the allocation
//! calculator and stored; approval turns the stored allocation into
//! journal entries.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::{ReportError, ReportWorkflow};
pub use types::{DepositInfo, MonthlyReport, ReportAction, ReportStatus};
