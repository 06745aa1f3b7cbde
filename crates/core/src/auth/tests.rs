use tesoreria_shared::types::{ChurchId, UserId};

use super::*;

fn actor(role: Role, church: Option<ChurchId>) -> Actor {
    Actor {
        user_id: UserId::new(),
        role,
        church_id: church,
    }
}

#[test]
fn test_capability_table() {
    assert!(Role::Admin.capabilities().can_approve_report);
    assert!(Role::NationalTreasurer.capabilities().can_approve_report);
    assert!(!Role::ChurchPastor.capabilities().can_approve_report);
    assert!(!Role::FundDirector.capabilities().can_approve_report);

    assert!(Role::Admin.capabilities().can_manage_event);
    assert!(Role::FundDirector.capabilities().can_manage_event);
    assert!(!Role::ChurchPastor.capabilities().can_manage_event);

    assert_eq!(Role::Admin.capabilities().scope, Scope::National);
    assert_eq!(Role::ChurchPastor.capabilities().scope, Scope::Church);
    assert_eq!(Role::FundDirector.capabilities().scope, Scope::Fund);
}

#[test]
fn test_event_submission_scoped_to_creator() {
    let creator = actor(Role::FundDirector, None);
    let other_director = actor(Role::FundDirector, None);
    let treasurer = actor(Role::NationalTreasurer, None);

    assert!(creator.authorize_event_submission(creator.user_id).is_ok());
    assert_eq!(
        other_director.authorize_event_submission(creator.user_id),
        Err(AuthError::NotEventCreator)
    );
    // National scope may submit on anyone's behalf.
    assert!(treasurer.authorize_event_submission(creator.user_id).is_ok());
}

#[test]
fn test_pastor_cannot_manage_events() {
    let pastor = actor(Role::ChurchPastor, Some(ChurchId::new()));
    assert_eq!(
        pastor.authorize_event_management(),
        Err(AuthError::CannotManageEvent(Role::ChurchPastor))
    );
}

#[test]
fn test_role_parse_roundtrip() {
    for role in [
        Role::Admin,
        Role::NationalTreasurer,
        Role::ChurchPastor,
        Role::FundDirector,
    ] {
        assert_eq!(Role::parse(role.as_str()).unwrap(), role);
    }
}

#[test]
fn test_unknown_role_is_an_error_not_a_default() {
    assert!(matches!(Role::parse("guest"), Err(AuthError::UnknownRole(_))));
    assert!(matches!(Role::parse(""), Err(AuthError::UnknownRole(_))));
}

#[test]
fn test_church_actor_scoped_to_own_church() {
    let church = ChurchId::new();
    let other = ChurchId::new();
    let pastor = actor(Role::ChurchPastor, Some(church));

    assert!(pastor.authorize_church(church).is_ok());
    assert_eq!(
        pastor.authorize_church(other),
        Err(AuthError::WrongChurch(other))
    );
}

#[test]
fn test_national_actor_acts_for_any_church() {
    let treasurer = actor(Role::NationalTreasurer, None);
    assert!(treasurer.authorize_church(ChurchId::new()).is_ok());
}

#[test]
fn test_pastor_cannot_approve_any_report() {
    let church = ChurchId::new();
    let pastor = actor(Role::ChurchPastor, Some(church));

    assert_eq!(
        pastor.authorize_report_approval(ChurchId::new()),
        Err(AuthError::CannotApproveReport(Role::ChurchPastor))
    );
}

#[test]
fn test_self_approval_rejected_even_for_capable_roles() {
    let church = ChurchId::new();
    // An admin attached to a church still may not approve that church's report.
    let admin = actor(Role::Admin, Some(church));

    assert_eq!(
        admin.authorize_report_approval(church),
        Err(AuthError::SelfApproval)
    );
    assert!(admin.authorize_report_approval(ChurchId::new()).is_ok());
}

#[test]
fn test_event_creator_cannot_self_approve() {
    let treasurer = actor(Role::NationalTreasurer, None);
    assert_eq!(
        treasurer.authorize_event_approval(treasurer.user_id),
        Err(AuthError::SelfEventApproval)
    );
    assert!(treasurer.authorize_event_approval(UserId::new()).is_ok());
}
