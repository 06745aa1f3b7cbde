use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tesoreria_shared::types::{ChurchId, FundId, UserId};

use crate::auth::{Actor, AuthError, Role};

use super::service::{EventError, EventWorkflow};
use super::types::{ActualItem, BudgetItem, EventAction, EventStatus, FundEvent};

fn director() -> Actor {
    Actor {
        user_id: UserId::new(),
        role: Role::FundDirector,
        church_id: None,
    }
}

fn treasurer() -> Actor {
    Actor {
        user_id: UserId::new(),
        role: Role::NationalTreasurer,
        church_id: None,
    }
}

fn budget_item(category: &str, estimated: Decimal) -> BudgetItem {
    BudgetItem {
        description: format!("{category} estimado"),
        category: category.to_string(),
        estimated,
    }
}

fn actual_item(category: &str, actual: Decimal) -> ActualItem {
    ActualItem {
        description: format!("{category} real"),
        category: category.to_string(),
        actual,
        receipt_number: Some("R-0001".to_string()),
    }
}

fn event_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

fn draft_event(creator: &Actor) -> FundEvent {
    EventWorkflow::create(
        creator,
        FundId::new(),
        None,
        "Congreso de jóvenes".to_string(),
        event_date(),
        vec![
            budget_item("alquiler", dec!(500000)),
            budget_item("comida", dec!(300000)),
        ],
    )
    .unwrap()
}

fn approved_event(creator: &Actor) -> FundEvent {
    let mut event = draft_event(creator);
    event.status = EventStatus::Approved;
    event
}

fn pastor() -> Actor {
    Actor {
        user_id: UserId::new(),
        role: Role::ChurchPastor,
        church_id: Some(ChurchId::new()),
    }
}

#[test]
fn test_pastor_cannot_create_event() {
    let result = EventWorkflow::create(
        &pastor(),
        FundId::new(),
        None,
        "Evento".to_string(),
        event_date(),
        vec![budget_item("alquiler", dec!(100000))],
    );
    assert!(matches!(
        result,
        Err(EventError::Auth(AuthError::CannotManageEvent(
            Role::ChurchPastor
        )))
    ));
}

#[test]
fn test_only_creator_submits_own_draft() {
    let creator = director();
    let event = draft_event(&creator);

    // Another director cannot push someone else's budget forward.
    let result = EventWorkflow::submit(&event, &director());
    assert!(matches!(
        result,
        Err(EventError::Auth(AuthError::NotEventCreator))
    ));

    // A pastor cannot submit at all, regardless of ownership.
    let result = EventWorkflow::submit(&event, &pastor());
    assert!(matches!(
        result,
        Err(EventError::Auth(AuthError::CannotManageEvent(
            Role::ChurchPastor
        )))
    ));

    assert!(EventWorkflow::submit(&event, &creator).is_ok());
}

#[test]
fn test_national_actor_submits_any_draft() {
    let creator = director();
    let event = draft_event(&creator);

    let action = EventWorkflow::submit(&event, &treasurer()).unwrap();
    assert!(matches!(
        action,
        EventAction::Submit {
            new_status: EventStatus::Submitted,
            ..
        }
    ));
}

#[test]
fn test_create_rejects_empty_budget() {
    let result = EventWorkflow::create(
        &director(),
        FundId::new(),
        None,
        "Evento".to_string(),
        event_date(),
        vec![],
    );
    assert!(matches!(result, Err(EventError::EmptyBudget)));
}

#[test]
fn test_submit_then_approve_by_other_actor() {
    let creator = director();
    let mut event = draft_event(&creator);

    let action = EventWorkflow::submit(&event, &creator).unwrap();
    let EventAction::Submit { new_status, .. } = action else {
        panic!("expected Submit action");
    };
    event.status = new_status;

    let action = EventWorkflow::approve(&event, &treasurer()).unwrap();
    assert!(matches!(
        action,
        EventAction::Approve {
            new_status: EventStatus::Approved,
            ..
        }
    ));
}

#[test]
fn test_creator_cannot_approve_own_event() {
    // The approver role alone is not enough: the creator is always barred.
    let creator = treasurer();
    let mut event = draft_event(&creator);
    event.status = EventStatus::Submitted;

    let result = EventWorkflow::approve(&event, &creator);
    assert!(matches!(
        result,
        Err(EventError::Auth(AuthError::SelfEventApproval))
    ));
}

#[test]
fn test_director_cannot_approve() {
    let creator = director();
    let mut event = draft_event(&creator);
    event.status = EventStatus::Submitted;

    let result = EventWorkflow::approve(&event, &director());
    assert!(matches!(
        result,
        Err(EventError::Auth(AuthError::CannotApproveEvent(
            Role::FundDirector
        )))
    ));
}

#[test]
fn test_reject_requires_reason() {
    let creator = director();
    let mut event = draft_event(&creator);
    event.status = EventStatus::Submitted;

    let result = EventWorkflow::reject(&event, &treasurer(), String::new());
    assert!(matches!(result, Err(EventError::RejectionReasonRequired)));
}

#[test]
fn test_actuals_only_on_approved_events() {
    let creator = director();
    let event = draft_event(&creator);

    let result = EventWorkflow::add_actuals(
        &event,
        vec![actual_item("alquiler", dec!(450000))],
        event_date(),
    );
    assert!(matches!(
        result,
        Err(EventError::NotApproved(EventStatus::Draft))
    ));
}

#[test]
fn test_actuals_rejected_before_event_date() {
    let creator = director();
    let event = approved_event(&creator);
    let early = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

    let result =
        EventWorkflow::add_actuals(&event, vec![actual_item("comida", dec!(100))], early);
    assert!(matches!(result, Err(EventError::BeforeEventDate(_))));
}

#[test]
fn test_actuals_compute_variance_and_expense_lines() {
    let creator = director();
    let event = approved_event(&creator);

    let action = EventWorkflow::add_actuals(
        &event,
        vec![
            actual_item("alquiler", dec!(550000)),
            actual_item("comida", dec!(250000)),
            actual_item("sonido", dec!(80000)),
        ],
        event_date(),
    )
    .unwrap();

    let EventAction::AddActuals {
        variances,
        expense_entries,
        ..
    } = action
    else {
        panic!("expected AddActuals action");
    };

    // Union of budget and actual categories, sorted.
    assert_eq!(variances.len(), 3);
    let rent = variances.iter().find(|v| v.category == "alquiler").unwrap();
    assert_eq!(rent.variance, dec!(50000)); // over budget
    let food = variances.iter().find(|v| v.category == "comida").unwrap();
    assert_eq!(food.variance, dec!(-50000)); // under budget
    let sound = variances.iter().find(|v| v.category == "sonido").unwrap();
    assert_eq!(sound.estimated, Decimal::ZERO);
    assert_eq!(sound.variance, dec!(80000)); // unbudgeted spend

    // One debit-only line per actual item, against the event's fund.
    assert_eq!(expense_entries.len(), 3);
    for entry in &expense_entries {
        assert_eq!(entry.fund_id, event.fund_id);
        assert!(entry.debit > Decimal::ZERO);
        assert!(entry.credit.is_zero());
    }
    let total_debits: Decimal = expense_entries.iter().map(|e| e.debit).sum();
    assert_eq!(total_debits, dec!(880000));
}

#[test]
fn test_negative_actual_rejected() {
    let creator = director();
    let event = approved_event(&creator);

    let result = EventWorkflow::add_actuals(
        &event,
        vec![actual_item("comida", dec!(-1))],
        event_date(),
    );
    assert!(matches!(result, Err(EventError::NegativeAmount)));
}
