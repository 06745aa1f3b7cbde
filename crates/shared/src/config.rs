//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Allocation configuration.
    #[serde(default)]
    pub allocation: AllocationSettings,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// National-fund allocation settings.
///
/// The percentage is handed to the allocation calculator as an explicit,
/// versioned value at call time; it is never read from ambient state, so a
/// historical period can be recomputed with the percentage that was in
/// force at the time.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationSettings {
    /// Percentage of tithes + offerings allocated to the national fund.
    #[serde(default = "default_national_fund_percent")]
    pub national_fund_percent: Decimal,
    /// Version of the allocation rules in force.
    #[serde(default = "default_allocation_version")]
    pub version: u32,
}

fn default_national_fund_percent() -> Decimal {
    Decimal::TEN
}

fn default_allocation_version() -> u32 {
    1
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            national_fund_percent: default_national_fund_percent(),
            version: default_allocation_version(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TESORERIA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
