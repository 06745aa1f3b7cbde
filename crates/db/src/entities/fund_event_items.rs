//! `SeaORM` Entity for the fund_event_items table.
//!
//! Holds both budgeted and realized line items, discriminated by `kind`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EventItemKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fund_event_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub kind: EventItemKind,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub receipt_number: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fund_events::Entity",
        from = "Column::EventId",
        to = "super::fund_events::Column::Id"
    )]
    FundEvents,
}

impl Related<super::fund_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
