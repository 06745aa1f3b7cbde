//! `SeaORM` Entity for the monthly_ledgers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LedgerStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub church_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub status: LedgerStatus,
    pub notes: Option<String>,
    pub closed_by: Option<Uuid>,
    pub closed_at: Option<DateTimeWithTimeZone>,
    pub reconciled_by: Option<Uuid>,
    pub reconciled_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::churches::Entity",
        from = "Column::ChurchId",
        to = "super::churches::Column::Id"
    )]
    Churches,
}

impl Related<super::churches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Churches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
