//! Core business logic for the treasury system.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `allocation` - National-fund allocation and pastoral honorarium math
//! - `ledger` - Double-entry journal validation and fund balance rules
//! - `period` - Monthly ledger lifecycle (open / close / reconcile)
//! - `report` - Monthly report approval workflow
//! - `event` - Fund event budgeting and actuals workflow
//! - `auth` - Role capability table and authorization checks
//! - `audit` - Structured audit events emitted by every mutation

pub mod allocation;
pub mod audit;
pub mod auth;
pub mod event;
pub mod ledger;
pub mod period;
pub mod report;
