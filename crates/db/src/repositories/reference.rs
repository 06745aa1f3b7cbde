//! Lookup repository for churches, funds, and fund balances.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use tesoreria_shared::error::AppError;
use tesoreria_shared::types::{ChurchId, FundId};

use crate::entities::{churches, fund_balances, funds};

/// Error types for reference lookups.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    /// Church not found.
    #[error("Church not found: {0}")]
    ChurchNotFound(Uuid),

    /// Fund not found.
    #[error("Fund not found: {0}")]
    FundNotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReferenceError> for AppError {
    fn from(err: ReferenceError) -> Self {
        match err {
            ReferenceError::ChurchNotFound(_) | ReferenceError::FundNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            ReferenceError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Read-only repository for the reference tables.
#[derive(Debug, Clone)]
pub struct ReferenceRepository {
    db: DatabaseConnection,
}

impl ReferenceRepository {
    /// Creates a new reference repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches one church by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if no church exists with this ID.
    pub async fn get_church(&self, church_id: ChurchId) -> Result<churches::Model, ReferenceError> {
        churches::Entity::find_by_id(church_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ReferenceError::ChurchNotFound(church_id.into_inner()))
    }

    /// Lists active churches ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_churches(&self) -> Result<Vec<churches::Model>, ReferenceError> {
        let rows = churches::Entity::find()
            .filter(churches::Column::Active.eq(true))
            .order_by_asc(churches::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Fetches one fund by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if no fund exists with this ID.
    pub async fn get_fund(&self, fund_id: FundId) -> Result<funds::Model, ReferenceError> {
        funds::Entity::find_by_id(fund_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| ReferenceError::FundNotFound(fund_id.into_inner().to_string()))
    }

    /// Fetches one fund by its stable code, e.g. `"general"`.
    ///
    /// # Errors
    ///
    /// Returns an error if no fund carries this code.
    pub async fn get_fund_by_code(&self, code: &str) -> Result<funds::Model, ReferenceError> {
        funds::Entity::find()
            .filter(funds::Column::Code.eq(code))
            .one(&self.db)
            .await?
            .ok_or_else(|| ReferenceError::FundNotFound(code.to_string()))
    }

    /// Lists active funds ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_funds(&self) -> Result<Vec<funds::Model>, ReferenceError> {
        let rows = funds::Entity::find()
            .filter(funds::Column::Active.eq(true))
            .order_by_asc(funds::Column::Code)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Returns the balance of a fund, zero when no balance row exists yet.
    ///
    /// National funds keep a single shared row with a NULL church; local
    /// funds keep one row per church.
    ///
    /// # Errors
    ///
    /// Returns an error if no fund exists with this ID.
    pub async fn get_balance(
        &self,
        fund_id: FundId,
        church_id: Option<ChurchId>,
    ) -> Result<Decimal, ReferenceError> {
        let fund = self.get_fund(fund_id).await?;

        let mut query = fund_balances::Entity::find()
            .filter(fund_balances::Column::FundId.eq(fund.id));
        query = if fund.is_national {
            query.filter(fund_balances::Column::ChurchId.is_null())
        } else {
            match church_id {
                Some(church) => {
                    query.filter(fund_balances::Column::ChurchId.eq(church.into_inner()))
                }
                None => query.filter(fund_balances::Column::ChurchId.is_null()),
            }
        };

        let row = query.one(&self.db).await?;
        Ok(row.map_or(Decimal::ZERO, |b| b.balance))
    }
}
