//! `SeaORM` Entity for the funds table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "funds")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    /// National funds hold one balance shared by all churches; local funds
    /// hold one balance per church.
    pub is_national: bool,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fund_balances::Entity")]
    FundBalances,
    #[sea_orm(has_many = "super::accounting_entries::Entity")]
    AccountingEntries,
    #[sea_orm(has_many = "super::fund_events::Entity")]
    FundEvents,
}

impl Related<super::fund_balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundBalances.def()
    }
}

impl Related<super::fund_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
