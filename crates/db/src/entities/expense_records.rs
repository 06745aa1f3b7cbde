//! `SeaORM` Entity for the expense_records table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub church_id: Uuid,
    pub fund_id: Uuid,
    pub expense_date: Date,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub provider_name: Option<String>,
    pub invoice_number: Option<String>,
    pub receipt_number: Option<String>,
    pub is_honorarium: bool,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::churches::Entity",
        from = "Column::ChurchId",
        to = "super::churches::Column::Id"
    )]
    Churches,
    #[sea_orm(
        belongs_to = "super::funds::Entity",
        from = "Column::FundId",
        to = "super::funds::Column::Id"
    )]
    Funds,
    #[sea_orm(has_many = "super::accounting_entries::Entity")]
    AccountingEntries,
}

impl Related<super::churches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Churches.def()
    }
}

impl Related<super::accounting_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountingEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
