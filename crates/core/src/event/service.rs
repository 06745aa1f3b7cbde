//! Stateless fund event workflow transitions.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tesoreria_shared::error::AppError;
use tesoreria_shared::types::{ChurchId, FundEventId, FundId};
use thiserror::Error;

use crate::auth::{Actor, AuthError};
use crate::ledger::{EntryInput, EntryReference};

use super::types::{
    ActualItem, BudgetItem, CategoryVariance, EventAction, EventStatus, FundEvent,
};

/// Errors for fund event workflow operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    /// The transition is not valid from the current status.
    #[error("Invalid transition: event is {from}, cannot move to {to}")]
    InvalidTransition {
        /// Current status.
        from: EventStatus,
        /// Attempted target status.
        to: EventStatus,
    },

    /// Rejection requires a non-empty reason.
    #[error("A rejection reason is required")]
    RejectionReasonRequired,

    /// Actuals may only be attached to approved events.
    #[error("Actuals can only be recorded on an approved event, status is {0}")]
    NotApproved(EventStatus),

    /// Actuals may only be recorded once the event date has passed.
    #[error("Actuals cannot be recorded before the event date {0}")]
    BeforeEventDate(NaiveDate),

    /// A budget or actual amount is negative.
    #[error("Item amounts must not be negative")]
    NegativeAmount,

    /// An event budget needs at least one line item.
    #[error("Event budget must have at least one item")]
    EmptyBudget,

    /// Authorization failure.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::InvalidTransition { .. } | EventError::NotApproved(_) => {
                Self::Conflict(err.to_string())
            }
            EventError::RejectionReasonRequired
            | EventError::BeforeEventDate(_)
            | EventError::NegativeAmount
            | EventError::EmptyBudget => Self::Validation(err.to_string()),
            EventError::Auth(e) => Self::Authorization(e.to_string()),
        }
    }
}

/// Stateless service for the fund event state machine.
pub struct EventWorkflow;

impl EventWorkflow {
    /// Creates a draft event budget.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor's role may manage fund events,
    /// or for an empty budget or negative amounts.
    pub fn create(
        actor: &Actor,
        fund_id: FundId,
        church_id: Option<ChurchId>,
        name: String,
        event_date: NaiveDate,
        budget_items: Vec<BudgetItem>,
    ) -> Result<FundEvent, EventError> {
        actor.authorize_event_management()?;
        if budget_items.is_empty() {
            return Err(EventError::EmptyBudget);
        }
        if budget_items.iter().any(|i| i.estimated < Decimal::ZERO) {
            return Err(EventError::NegativeAmount);
        }

        Ok(FundEvent {
            id: FundEventId::new(),
            fund_id,
            church_id,
            name,
            event_date,
            budget_items,
            actual_items: vec![],
            status: EventStatus::Draft,
            created_by: actor.user_id,
            created_at: Utc::now(),
            submitted_by: None,
            submitted_at: None,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
        })
    }

    /// Submits a draft budget for approval.
    ///
    /// Only the creating director (or a national-scope actor) may submit.
    ///
    /// # Errors
    ///
    /// Returns an error unless the event is a draft and the actor may
    /// submit it.
    pub fn submit(event: &FundEvent, actor: &Actor) -> Result<EventAction, EventError> {
        actor.authorize_event_submission(event.created_by)?;
        if event.status != EventStatus::Draft {
            return Err(EventError::InvalidTransition {
                from: event.status,
                to: EventStatus::Submitted,
            });
        }

        Ok(EventAction::Submit {
            new_status: EventStatus::Submitted,
            submitted_by: actor.user_id,
            submitted_at: Utc::now(),
        })
    }

    /// Approves a submitted budget.
    ///
    /// A fund-level approver must approve, never the creating director.
    ///
    /// # Errors
    ///
    /// Returns an error unless the event is submitted and the actor holds
    /// the event-approval capability and is not the creator.
    pub fn approve(event: &FundEvent, actor: &Actor) -> Result<EventAction, EventError> {
        actor.authorize_event_approval(event.created_by)?;
        if event.status != EventStatus::Submitted {
            return Err(EventError::InvalidTransition {
                from: event.status,
                to: EventStatus::Approved,
            });
        }

        Ok(EventAction::Approve {
            new_status: EventStatus::Approved,
            approved_by: actor.user_id,
            approved_at: Utc::now(),
        })
    }

    /// Rejects a submitted budget with a mandatory reason.
    ///
    /// # Errors
    ///
    /// Returns an error unless the event is submitted and the reason is
    /// non-empty.
    pub fn reject(
        event: &FundEvent,
        actor: &Actor,
        reason: String,
    ) -> Result<EventAction, EventError> {
        actor.authorize_event_approval(event.created_by)?;
        if reason.trim().is_empty() {
            return Err(EventError::RejectionReasonRequired);
        }
        if event.status != EventStatus::Submitted {
            return Err(EventError::InvalidTransition {
                from: event.status,
                to: EventStatus::Rejected,
            });
        }

        Ok(EventAction::Reject {
            new_status: EventStatus::Rejected,
            reason,
        })
    }

    /// Attaches actuals to an approved event and reconciles them against
    /// the budget.
    ///
    /// Produces per-category variances (`actual - estimated`) and one
    /// debit-only expense line per actual item against the event's fund,
    /// executed by the persistence layer with the same atomic
    /// entries-plus-balance discipline as any journal write.
    ///
    /// # Errors
    ///
    /// Returns an error unless the event is approved, `on_date` is not
    /// before the event date, and all amounts are non-negative.
    pub fn add_actuals(
        event: &FundEvent,
        items: Vec<ActualItem>,
        on_date: NaiveDate,
    ) -> Result<EventAction, EventError> {
        if event.status != EventStatus::Approved {
            return Err(EventError::NotApproved(event.status));
        }
        if on_date < event.event_date {
            return Err(EventError::BeforeEventDate(event.event_date));
        }
        if items.iter().any(|i| i.actual < Decimal::ZERO) {
            return Err(EventError::NegativeAmount);
        }

        let variances = Self::variances(&event.budget_items, &items);

        let expense_entries = items
            .iter()
            .filter(|item| item.actual > Decimal::ZERO)
            .map(|item| EntryInput {
                fund_id: event.fund_id,
                date: on_date,
                debit: item.actual,
                credit: Decimal::ZERO,
                description: format!("{}: {}", event.name, item.description),
                reference: Some(EntryReference::Event(event.id)),
            })
            .collect();

        Ok(EventAction::AddActuals {
            items,
            variances,
            expense_entries,
        })
    }

    /// Computes budget vs actual per category over the union of categories.
    #[must_use]
    pub fn variances(budget: &[BudgetItem], actuals: &[ActualItem]) -> Vec<CategoryVariance> {
        let mut estimated: BTreeMap<&str, Decimal> = BTreeMap::new();
        for item in budget {
            *estimated.entry(item.category.as_str()).or_insert(Decimal::ZERO) += item.estimated;
        }
        let mut actual: BTreeMap<&str, Decimal> = BTreeMap::new();
        for item in actuals {
            *actual.entry(item.category.as_str()).or_insert(Decimal::ZERO) += item.actual;
        }

        let mut categories: Vec<&str> = estimated.keys().chain(actual.keys()).copied().collect();
        categories.sort_unstable();
        categories.dedup();

        categories
            .into_iter()
            .map(|category| {
                let est = estimated.get(category).copied().unwrap_or(Decimal::ZERO);
                let act = actual.get(category).copied().unwrap_or(Decimal::ZERO);
                CategoryVariance {
                    category: category.to_string(),
                    estimated: est,
                    actual: act,
                    variance: act - est,
                }
            })
            .collect()
    }
}
