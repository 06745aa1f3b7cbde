//! `SeaORM` Entity for the monthly_reports table.
//!
//! Income and designated lines are stored as JSON documents; the computed
//! allocation snapshot is denormalized into columns so approved reports
//! keep the numbers they were approved with, whatever the current
//! allocation configuration says.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ReportStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub church_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub tithes: Decimal,
    pub offerings: Decimal,
    pub other_income: Decimal,
    /// JSON array of designated offering lines.
    pub designated: Json,
    /// JSON array of operating expense lines.
    pub operating_expenses: Json,
    pub national_fund: Decimal,
    pub designated_total: Decimal,
    pub total_income: Decimal,
    pub total_operating_expenses: Decimal,
    pub pastoral_honorarium: Decimal,
    pub deficit: Decimal,
    pub allocation_version: i32,
    pub bank_receipt_number: Option<String>,
    pub bank_deposit_date: Option<Date>,
    pub status: ReportStatus,
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
        belongs_to = "super::churches::Entity",
        from = "Column::ChurchId",
        to = "super::churches::Column::Id"
    )]
    Churches,
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
