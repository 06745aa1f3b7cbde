//! `SeaORM` entity definitions for the treasury schema.

pub mod accounting_entries;
pub mod audit_log;
pub mod churches;
pub mod expense_records;
pub mod fund_balances;
pub mod fund_event_items;
pub mod fund_events;
pub mod funds;
pub mod monthly_ledgers;
pub mod monthly_reports;
pub mod sea_orm_active_enums;
