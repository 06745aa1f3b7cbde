//! `SeaORM` Entity for the fund_events table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EventStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fund_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub fund_id: Uuid,
    pub church_id: Option<Uuid>,
    pub name: String,
    pub event_date: Date,
    pub status: EventStatus,
    pub rejection_reason: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub submitted_by: Option<Uuid>,
    pub submitted_at: Option<DateTimeWithTimeZone>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
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
    #[sea_orm(has_many = "super::fund_event_items::Entity")]
    FundEventItems,
    #[sea_orm(has_many = "super::accounting_entries::Entity")]
    AccountingEntries,
}

impl Related<super::funds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Funds.def()
    }
}

impl Related<super::fund_event_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundEventItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
