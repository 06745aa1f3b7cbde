//! `SeaORM` Entity for the fund_balances table.
//!
//! One row per (fund, church) for local funds, one row with a NULL church
//! for national funds. The `version` column backs optimistic locking: every
//! balance update increments it, and writers that lose the race retry.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fund_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub fund_id: Uuid,
    pub church_id: Option<Uuid>,
    pub balance: Decimal,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::funds::Entity",
        from = "Column::FundId",
        to = "super::funds::Column::Id"
    )]
    Funds,
    #[sea_orm(
        belongs_to = "super::churches::Entity",
        from = "Column::ChurchId",
        to = "super::churches::Column::Id"
    )]
    Churches,
}

impl Related<super::funds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Funds.def()
    }
}

impl Related<super::churches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Churches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
