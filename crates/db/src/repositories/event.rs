//! Event repository for fund event budgets and their actuals.
//!
//! Recording actuals is the posting path: the actual item rows, the
//! debit-only journal lines against the event's fund, the balance deltas,
//! and the audit row commit together or not at all.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use tesoreria_core::audit::{AuditAction, AuditEvent};
use tesoreria_core::auth::Actor;
use tesoreria_core::event::{
    ActualItem, BudgetItem, CategoryVariance, EventAction, EventError as EventWorkflowError,
    EventStatus, EventWorkflow, FundEvent,
};
use tesoreria_core::ledger::resolve_deltas;
use tesoreria_shared::error::AppError;
use tesoreria_shared::types::{ChurchId, FundEventId, FundId, UserId};

use crate::entities::{
    fund_event_items, fund_events,
    sea_orm_active_enums::{EventItemKind, EventStatus as DbEventStatus},
};

use super::journal::{apply_fund_deltas, insert_entries, JournalError};
use super::insert_audit;

/// Error types for fund event operations.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Event not found.
    #[error("Event not found: {0}")]
    NotFound(Uuid),

    /// A workflow rule was violated.
    #[error(transparent)]
    Workflow(#[from] EventWorkflowError),

    /// Posting the actuals' journal lines failed.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// The event's status changed under us; the transition lost a race.
    #[error("Event status changed concurrently, please retry")]
    StatusChanged,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(_) => Self::NotFound(err.to_string()),
            EventError::Workflow(e) => e.into(),
            EventError::Journal(e) => e.into(),
            EventError::StatusChanged => Self::Conflict(err.to_string()),
            EventError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a fund event with its budget.
#[derive(Debug, Clone)]
pub struct CreateEventInput {
    /// The fund financing the event.
    pub fund_id: FundId,
    /// Optional church the event is held at.
    pub church_id: Option<ChurchId>,
    /// Event name.
    pub name: String,
    /// When the event takes place.
    pub event_date: NaiveDate,
    /// Planned line items; must be non-empty.
    pub budget_items: Vec<BudgetItem>,
}

/// A fund event with its stored line items.
#[derive(Debug, Clone)]
pub struct EventWithItems {
    /// The event row.
    pub event: fund_events::Model,
    /// Budgeted and realized line items.
    pub items: Vec<fund_event_items::Model>,
}

/// Output of recording actuals.
#[derive(Debug, Clone)]
pub struct RecordedActuals {
    /// The event with all its items.
    pub event: EventWithItems,
    /// Budget vs actual per category.
    pub variances: Vec<CategoryVariance>,
}

/// Event repository for the fund event workflow.
#[derive(Debug, Clone)]
pub struct EventRepository {
    db: DatabaseConnection,
}

impl EventRepository {
    /// Creates a new event repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft event with its budget items.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty budget or negative amounts.
    pub async fn create_event(
        &self,
        actor: &Actor,
        input: CreateEventInput,
    ) -> Result<EventWithItems, EventError> {
        let event = EventWorkflow::create(
            actor,
            input.fund_id,
            input.church_id,
            input.name,
            input.event_date,
            input.budget_items,
        )?;

        let txn = self.db.begin().await?;

        let now = now_tz();
        let row = fund_events::ActiveModel {
            id: Set(event.id.into_inner()),
            fund_id: Set(event.fund_id.into_inner()),
            church_id: Set(event.church_id.map(ChurchId::into_inner)),
            name: Set(event.name.clone()),
            event_date: Set(event.event_date),
            status: Set(DbEventStatus::Draft),
            rejection_reason: Set(None),
            created_by: Set(event.created_by.into_inner()),
            created_at: Set(event.created_at.into()),
            submitted_by: Set(None),
            submitted_at: Set(None),
            approved_by: Set(None),
            approved_at: Set(None),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(event.budget_items.len());
        for item in &event.budget_items {
            let stored = fund_event_items::ActiveModel {
                id: Set(Uuid::now_v7()),
                event_id: Set(row.id),
                kind: Set(EventItemKind::Budget),
                description: Set(item.description.clone()),
                category: Set(item.category.clone()),
                amount: Set(item.estimated),
                receipt_number: Set(None),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            items.push(stored);
        }

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::CreateEvent,
            "fund_event",
            row.id,
            serde_json::json!({
                "fund_id": event.fund_id,
                "name": event.name,
                "estimated_total": event.estimated_total(),
            }),
        );
        insert_audit(&txn, &audit).await?;

        txn.commit().await?;

        tracing::info!(event = %row.id, fund = %event.fund_id, "fund event created");

        Ok(EventWithItems { event: row, items })
    }

    /// Submits a draft budget for approval.
    ///
    /// # Errors
    ///
    /// Returns an error unless the event is a draft.
    pub async fn submit_event(
        &self,
        actor: &Actor,
        event_id: FundEventId,
    ) -> Result<fund_events::Model, EventError> {
        let txn = self.db.begin().await?;
        let (row, event) = load_event(&txn, event_id).await?;

        let EventAction::Submit {
            submitted_by,
            submitted_at,
            ..
        } = EventWorkflow::submit(&event, actor)?
        else {
            return Err(EventError::StatusChanged);
        };

        let updated = fund_events::Entity::update_many()
            .col_expr(
                fund_events::Column::Status,
                Expr::value(DbEventStatus::Submitted),
            )
            .col_expr(
                fund_events::Column::SubmittedBy,
                Expr::value(Some(submitted_by.into_inner())),
            )
            .col_expr(
                fund_events::Column::SubmittedAt,
                Expr::value(Some(sea_orm::prelude::DateTimeWithTimeZone::from(
                    submitted_at,
                ))),
            )
            .col_expr(fund_events::Column::UpdatedAt, Expr::value(now_tz()))
            .filter(fund_events::Column::Id.eq(row.id))
            .filter(fund_events::Column::Status.eq(DbEventStatus::Draft))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(EventError::StatusChanged);
        }

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::SubmitEvent,
            "fund_event",
            row.id,
            serde_json::json!({ "fund_id": event.fund_id }),
        );
        insert_audit(&txn, &audit).await?;

        let refreshed = find_event(&txn, event_id).await?;
        txn.commit().await?;
        Ok(refreshed)
    }

    /// Approves a submitted budget. The creator can never self-approve.
    ///
    /// # Errors
    ///
    /// Returns an error unless the event is submitted and the actor holds
    /// the event-approval capability and is not the creator.
    pub async fn approve_event(
        &self,
        actor: &Actor,
        event_id: FundEventId,
    ) -> Result<fund_events::Model, EventError> {
        let txn = self.db.begin().await?;
        let (row, event) = load_event(&txn, event_id).await?;

        let EventAction::Approve {
            approved_by,
            approved_at,
            ..
        } = EventWorkflow::approve(&event, actor)?
        else {
            return Err(EventError::StatusChanged);
        };

        let updated = fund_events::Entity::update_many()
            .col_expr(
                fund_events::Column::Status,
                Expr::value(DbEventStatus::Approved),
            )
            .col_expr(
                fund_events::Column::ApprovedBy,
                Expr::value(Some(approved_by.into_inner())),
            )
            .col_expr(
                fund_events::Column::ApprovedAt,
                Expr::value(Some(sea_orm::prelude::DateTimeWithTimeZone::from(
                    approved_at,
                ))),
            )
            .col_expr(fund_events::Column::UpdatedAt, Expr::value(now_tz()))
            .filter(fund_events::Column::Id.eq(row.id))
            .filter(fund_events::Column::Status.eq(DbEventStatus::Submitted))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(EventError::StatusChanged);
        }

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::ApproveEvent,
            "fund_event",
            row.id,
            serde_json::json!({ "fund_id": event.fund_id }),
        );
        insert_audit(&txn, &audit).await?;

        let refreshed = find_event(&txn, event_id).await?;
        txn.commit().await?;

        tracing::info!(event = %row.id, "fund event approved");

        Ok(refreshed)
    }

    /// Rejects a submitted budget with a mandatory reason.
    ///
    /// # Errors
    ///
    /// Returns an error unless the event is submitted and the reason is
    /// non-empty.
    pub async fn reject_event(
        &self,
        actor: &Actor,
        event_id: FundEventId,
        reason: String,
    ) -> Result<fund_events::Model, EventError> {
        let txn = self.db.begin().await?;
        let (row, event) = load_event(&txn, event_id).await?;

        let EventAction::Reject { reason, .. } = EventWorkflow::reject(&event, actor, reason)?
        else {
            return Err(EventError::StatusChanged);
        };

        let updated = fund_events::Entity::update_many()
            .col_expr(
                fund_events::Column::Status,
                Expr::value(DbEventStatus::Rejected),
            )
            .col_expr(
                fund_events::Column::RejectionReason,
                Expr::value(Some(reason.clone())),
            )
            .col_expr(fund_events::Column::UpdatedAt, Expr::value(now_tz()))
            .filter(fund_events::Column::Id.eq(row.id))
            .filter(fund_events::Column::Status.eq(DbEventStatus::Submitted))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(EventError::StatusChanged);
        }

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::RejectEvent,
            "fund_event",
            row.id,
            serde_json::json!({ "fund_id": event.fund_id, "reason": reason }),
        );
        insert_audit(&txn, &audit).await?;

        let refreshed = find_event(&txn, event_id).await?;
        txn.commit().await?;
        Ok(refreshed)
    }

    /// Records actuals on an approved event and posts their expense lines.
    ///
    /// # Errors
    ///
    /// Returns an error unless the event is approved, `on_date` is not
    /// before the event date, amounts are non-negative, and the fund can
    /// absorb the spend.
    pub async fn add_actuals(
        &self,
        actor: &Actor,
        event_id: FundEventId,
        actual_items: Vec<ActualItem>,
        on_date: NaiveDate,
    ) -> Result<RecordedActuals, EventError> {
        let txn = self.db.begin().await?;
        let (row, event) = load_event(&txn, event_id).await?;

        let EventAction::AddActuals {
            items,
            variances,
            expense_entries,
        } = EventWorkflow::add_actuals(&event, actual_items, on_date)?
        else {
            return Err(EventError::StatusChanged);
        };

        let now = now_tz();
        for item in &items {
            fund_event_items::ActiveModel {
                id: Set(Uuid::now_v7()),
                event_id: Set(row.id),
                kind: Set(EventItemKind::Actual),
                description: Set(item.description.clone()),
                category: Set(item.category.clone()),
                amount: Set(item.actual),
                receipt_number: Set(item.receipt_number.clone()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        if !expense_entries.is_empty() {
            let deltas = resolve_deltas(&expense_entries);
            apply_fund_deltas(&txn, event.church_id, &deltas, false).await?;
            insert_entries(&txn, event.church_id, actor.user_id, &expense_entries)
                .await
                .map_err(JournalError::from)?;
        }

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::AddActuals,
            "fund_event",
            row.id,
            serde_json::json!({
                "fund_id": event.fund_id,
                "items": items.len(),
                "actual_total": items.iter().map(|i| i.actual).sum::<rust_decimal::Decimal>(),
            }),
        );
        insert_audit(&txn, &audit).await?;

        let refreshed = self.fetch_with_items(&txn, event_id).await?;
        txn.commit().await?;

        tracing::info!(
            event = %row.id,
            items = refreshed.items.len(),
            "event actuals recorded"
        );

        Ok(RecordedActuals {
            event: refreshed,
            variances,
        })
    }

    /// Fetches one event with all its line items.
    ///
    /// # Errors
    ///
    /// Returns an error if no event exists with this ID.
    pub async fn get_event(&self, event_id: FundEventId) -> Result<EventWithItems, EventError> {
        let event = fund_events::Entity::find_by_id(event_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(EventError::NotFound(event_id.into_inner()))?;
        let items = fund_event_items::Entity::find()
            .filter(fund_event_items::Column::EventId.eq(event.id))
            .order_by_asc(fund_event_items::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(EventWithItems { event, items })
    }

    async fn fetch_with_items(
        &self,
        txn: &DatabaseTransaction,
        event_id: FundEventId,
    ) -> Result<EventWithItems, EventError> {
        let event = find_event(txn, event_id).await?;
        let items = fund_event_items::Entity::find()
            .filter(fund_event_items::Column::EventId.eq(event.id))
            .order_by_asc(fund_event_items::Column::CreatedAt)
            .all(txn)
            .await?;
        Ok(EventWithItems { event, items })
    }
}

async fn find_event(
    txn: &DatabaseTransaction,
    event_id: FundEventId,
) -> Result<fund_events::Model, EventError> {
    fund_events::Entity::find_by_id(event_id.into_inner())
        .one(txn)
        .await?
        .ok_or(EventError::NotFound(event_id.into_inner()))
}

async fn load_event(
    txn: &DatabaseTransaction,
    event_id: FundEventId,
) -> Result<(fund_events::Model, FundEvent), EventError> {
    let row = find_event(txn, event_id).await?;
    let items = fund_event_items::Entity::find()
        .filter(fund_event_items::Column::EventId.eq(row.id))
        .all(txn)
        .await?;
    let event = event_to_domain(&row, &items);
    Ok((row, event))
}

/// Rebuilds the domain event from its stored row and items.
#[must_use]
pub(crate) fn event_to_domain(
    row: &fund_events::Model,
    items: &[fund_event_items::Model],
) -> FundEvent {
    let budget_items = items
        .iter()
        .filter(|i| i.kind == EventItemKind::Budget)
        .map(|i| BudgetItem {
            description: i.description.clone(),
            category: i.category.clone(),
            estimated: i.amount,
        })
        .collect();
    let actual_items = items
        .iter()
        .filter(|i| i.kind == EventItemKind::Actual)
        .map(|i| ActualItem {
            description: i.description.clone(),
            category: i.category.clone(),
            actual: i.amount,
            receipt_number: i.receipt_number.clone(),
        })
        .collect();

    FundEvent {
        id: FundEventId::from_uuid(row.id),
        fund_id: FundId::from_uuid(row.fund_id),
        church_id: row.church_id.map(ChurchId::from_uuid),
        name: row.name.clone(),
        event_date: row.event_date,
        budget_items,
        actual_items,
        status: EventStatus::from(row.status),
        created_by: UserId::from_uuid(row.created_by),
        created_at: row.created_at.into(),
        submitted_by: row.submitted_by.map(UserId::from_uuid),
        submitted_at: row.submitted_at.map(Into::into),
        approved_by: row.approved_by.map(UserId::from_uuid),
        approved_at: row.approved_at.map(Into::into),
        rejection_reason: row.rejection_reason.clone(),
    }
}

fn now_tz() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn event_row(status: DbEventStatus) -> fund_events::Model {
        let now = now_tz();
        fund_events::Model {
            id: Uuid::now_v7(),
            fund_id: Uuid::now_v7(),
            church_id: None,
            name: "Congreso nacional".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            status,
            rejection_reason: None,
            created_by: Uuid::now_v7(),
            created_at: now,
            submitted_by: None,
            submitted_at: None,
            approved_by: None,
            approved_at: None,
            updated_at: now,
        }
    }

    fn item_row(event_id: Uuid, kind: EventItemKind, category: &str) -> fund_event_items::Model {
        fund_event_items::Model {
            id: Uuid::now_v7(),
            event_id,
            kind,
            description: format!("{category} del congreso"),
            category: category.to_string(),
            amount: dec!(100000),
            receipt_number: None,
            created_at: now_tz(),
        }
    }

    #[test]
    fn test_event_to_domain_splits_items_by_kind() {
        let row = event_row(DbEventStatus::Approved);
        let items = vec![
            item_row(row.id, EventItemKind::Budget, "alquiler"),
            item_row(row.id, EventItemKind::Budget, "comida"),
            item_row(row.id, EventItemKind::Actual, "alquiler"),
        ];

        let event = event_to_domain(&row, &items);
        assert_eq!(event.budget_items.len(), 2);
        assert_eq!(event.actual_items.len(), 1);
        assert_eq!(event.estimated_total(), dec!(200000));
        assert_eq!(event.actual_total(), dec!(100000));
        assert_eq!(event.status, EventStatus::Approved);
    }

    #[test]
    fn test_domain_status_drives_workflow_checks() {
        let row = event_row(DbEventStatus::Draft);
        let event = event_to_domain(&row, &[]);

        let result = EventWorkflow::add_actuals(
            &event,
            vec![ActualItem {
                description: "alquiler".to_string(),
                category: "alquiler".to_string(),
                actual: dec!(1),
                receipt_number: None,
            }],
            row.event_date,
        );
        assert!(matches!(
            result,
            Err(EventWorkflowError::NotApproved(EventStatus::Draft))
        ));
    }
}
