//! `SeaORM` Entity for the churches table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "churches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub pastor_name: Option<String>,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::monthly_ledgers::Entity")]
    MonthlyLedgers,
    #[sea_orm(has_many = "super::monthly_reports::Entity")]
    MonthlyReports,
    #[sea_orm(has_many = "super::accounting_entries::Entity")]
    AccountingEntries,
    #[sea_orm(has_many = "super::expense_records::Entity")]
    ExpenseRecords,
}

impl Related<super::monthly_ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyLedgers.def()
    }
}

impl Related<super::monthly_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyReports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
