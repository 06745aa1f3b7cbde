//! Shared types, errors, and configuration for the treasury system.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with decimal precision (whole-guarani amounts)
//! - Typed IDs for type-safe entity references
//! - Application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
