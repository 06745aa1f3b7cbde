//! National-fund allocation and pastoral honorarium math.
//!
//! The calculator is a pure function: no state, no I/O, deterministic for a
//! given [`AllocationConfig`]. The configuration is passed in at call time
//! so historical periods can be recomputed with the percentage that was in
//! force when they were approved.

pub mod calculator;
pub mod types;

#[cfg(test)]
mod props;

pub use calculator::{allocate, AllocationError};
pub use types::{
    AllocationConfig, AllocationResult, DesignatedLine, ExpenseLine, ExpenseLines, IncomeLines,
};
