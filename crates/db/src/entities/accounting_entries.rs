//! `SeaORM` Entity for the accounting_entries table.
//!
//! The append-only journal. An entry carries either a debit or a credit,
//! never both, and optionally references the report, expense, or event
//! that produced it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounting_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// NULL for lines posted by church-less national fund events.
    pub church_id: Option<Uuid>,
    pub fund_id: Uuid,
    pub entry_date: Date,
    pub debit: Decimal,
    pub credit: Decimal,
    pub description: String,
    pub report_id: Option<Uuid>,
    pub expense_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
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
    #[sea_orm(
        belongs_to = "super::monthly_reports::Entity",
        from = "Column::ReportId",
        to = "super::monthly_reports::Column::Id"
    )]
    MonthlyReports,
    #[sea_orm(
        belongs_to = "super::expense_records::Entity",
        from = "Column::ExpenseId",
        to = "super::expense_records::Column::Id"
    )]
    ExpenseRecords,
    #[sea_orm(
        belongs_to = "super::fund_events::Entity",
        from = "Column::EventId",
        to = "super::fund_events::Column::Id"
    )]
    FundEvents,
}

impl Related<super::churches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Churches.def()
    }
}

impl Related<super::funds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Funds.def()
    }
}

impl Related<super::monthly_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyReports.def()
    }
}

impl Related<super::expense_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseRecords.def()
    }
}

impl Related<super::fund_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FundEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
