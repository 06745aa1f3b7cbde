//! Fund event budgeting and actuals workflow.
//!
//! A fund event is a budgeted, fund-scoped activity. The budget moves
//! draft → submitted → approved/rejected; after approval and the event
//! date, actuals are attached and reconciled against the budget per
//! category.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::{EventError, EventWorkflow};
pub use types::{
    ActualItem, BudgetItem, CategoryVariance, EventAction, EventStatus, FundEvent,
};
