use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tesoreria_shared::types::{ChurchId, FundId, UserId};

use crate::allocation::{AllocationConfig, DesignatedLine, ExpenseLines, IncomeLines};
use crate::auth::{Actor, AuthError, Role};
use crate::ledger::validate_batch;

use super::service::{ReportError, ReportWorkflow};
use super::types::{DepositInfo, MonthlyReport, ReportAction, ReportStatus};

fn pastor(church: ChurchId) -> Actor {
    Actor {
        user_id: UserId::new(),
        role: Role::ChurchPastor,
        church_id: Some(church),
    }
}

fn treasurer() -> Actor {
    Actor {
        user_id: UserId::new(),
        role: Role::NationalTreasurer,
        church_id: None,
    }
}

fn income(tithes: Decimal, offerings: Decimal) -> IncomeLines {
    IncomeLines {
        tithes,
        offerings,
        other: Decimal::ZERO,
        designated: vec![],
    }
}

fn draft_report(church: ChurchId, inc: IncomeLines) -> MonthlyReport {
    ReportWorkflow::create(
        &pastor(church),
        church,
        1,
        2025,
        inc,
        ExpenseLines::default(),
        DepositInfo::default(),
        &AllocationConfig::default(),
        false,
    )
    .unwrap()
}

fn submitted_report(church: ChurchId, inc: IncomeLines) -> MonthlyReport {
    let mut report = draft_report(church, inc);
    let action = ReportWorkflow::submit(&report, &pastor(church)).unwrap();
    if let ReportAction::Submit { new_status, .. } = action {
        report.status = new_status;
    }
    report
}

#[test]
fn test_create_computes_allocation_eagerly() {
    let church = ChurchId::new();
    let report = draft_report(church, income(dec!(1000000), dec!(500000)));

    assert_eq!(report.status, ReportStatus::Draft);
    assert_eq!(report.allocation.national_fund, dec!(150000));
    assert_eq!(report.allocation.pastoral_honorarium, dec!(1350000));
}

#[test]
fn test_create_duplicate_conflicts() {
    let church = ChurchId::new();
    let result = ReportWorkflow::create(
        &pastor(church),
        church,
        1,
        2025,
        income(dec!(100), dec!(0)),
        ExpenseLines::default(),
        DepositInfo::default(),
        &AllocationConfig::default(),
        true,
    );
    assert!(matches!(result, Err(ReportError::AlreadyExists { .. })));
}

#[test]
fn test_create_requires_church_scope() {
    let church = ChurchId::new();
    let outsider = pastor(ChurchId::new());
    let result = ReportWorkflow::create(
        &outsider,
        church,
        1,
        2025,
        income(dec!(100), dec!(0)),
        ExpenseLines::default(),
        DepositInfo::default(),
        &AllocationConfig::default(),
        false,
    );
    assert!(matches!(
        result,
        Err(ReportError::Auth(AuthError::WrongChurch(_)))
    ));
}

#[test]
fn test_submit_only_from_draft() {
    let church = ChurchId::new();
    let report = submitted_report(church, income(dec!(100), dec!(0)));

    let again = ReportWorkflow::submit(&report, &pastor(church));
    assert!(matches!(
        again,
        Err(ReportError::InvalidTransition {
            from: ReportStatus::Submitted,
            to: ReportStatus::Submitted,
        })
    ));
}

#[test]
fn test_approve_generates_balanced_allocation_batch() {
    let church = ChurchId::new();
    let missions = FundId::new();
    let mut inc = income(dec!(1000000), dec!(500000));
    inc.designated.push(DesignatedLine {
        fund_id: missions,
        description: "Misiones".to_string(),
        amount: dec!(200000),
    });
    let report = submitted_report(church, inc);

    let general = FundId::new();
    let national = FundId::new();
    let action = ReportWorkflow::approve(&report, &treasurer(), general, national).unwrap();

    let ReportAction::Approve {
        new_status,
        income_entry,
        allocation_entries,
        ..
    } = action
    else {
        panic!("expected Approve action");
    };

    assert_eq!(new_status, ReportStatus::Approved);

    // Income recognition credits the general fund with the full income.
    assert_eq!(income_entry.fund_id, general);
    assert_eq!(income_entry.credit, dec!(1700000));
    assert_eq!(income_entry.debit, Decimal::ZERO);

    // The allocation batch balances and moves allocation + designated out.
    validate_batch(&allocation_entries).unwrap();
    let to_national: Decimal = allocation_entries
        .iter()
        .filter(|e| e.fund_id == national)
        .map(|e| e.credit)
        .sum();
    let to_missions: Decimal = allocation_entries
        .iter()
        .filter(|e| e.fund_id == missions)
        .map(|e| e.credit)
        .sum();
    assert_eq!(to_national, dec!(150000));
    assert_eq!(to_missions, dec!(200000));

    // Net effect on the general fund over both writes: the local share.
    let general_net: Decimal = allocation_entries
        .iter()
        .filter(|e| e.fund_id == general)
        .map(|e| e.credit - e.debit)
        .sum::<Decimal>()
        + income_entry.credit;
    assert_eq!(general_net, dec!(1350000));
}

#[test]
fn test_church_actor_cannot_self_approve() {
    let church = ChurchId::new();
    let report = submitted_report(church, income(dec!(100), dec!(0)));

    let result =
        ReportWorkflow::approve(&report, &pastor(church), FundId::new(), FundId::new());
    assert!(matches!(
        result,
        Err(ReportError::Auth(AuthError::CannotApproveReport(_)))
    ));
    // Status unchanged on the failed call.
    assert_eq!(report.status, ReportStatus::Submitted);
}

#[test]
fn test_approve_requires_submitted() {
    let church = ChurchId::new();
    let report = draft_report(church, income(dec!(100), dec!(0)));

    let result =
        ReportWorkflow::approve(&report, &treasurer(), FundId::new(), FundId::new());
    assert!(matches!(
        result,
        Err(ReportError::InvalidTransition {
            from: ReportStatus::Draft,
            to: ReportStatus::Approved,
        })
    ));
}

#[test]
fn test_reject_requires_reason() {
    let church = ChurchId::new();
    let report = submitted_report(church, income(dec!(100), dec!(0)));

    let result = ReportWorkflow::reject(&report, &treasurer(), "   ".to_string());
    assert!(matches!(result, Err(ReportError::RejectionReasonRequired)));

    let action =
        ReportWorkflow::reject(&report, &treasurer(), "Montos no coinciden".to_string()).unwrap();
    assert!(matches!(
        action,
        ReportAction::Reject {
            new_status: ReportStatus::Rejected,
            ..
        }
    ));
}

#[test]
fn test_rejected_report_reopens_to_draft() {
    let church = ChurchId::new();
    let mut report = submitted_report(church, income(dec!(100), dec!(0)));
    report.status = ReportStatus::Rejected;

    let action = ReportWorkflow::reopen(&report, &pastor(church)).unwrap();
    assert!(matches!(
        action,
        ReportAction::Reopen {
            new_status: ReportStatus::Draft,
        }
    ));

    // Only the owning church may reopen.
    let outsider = pastor(ChurchId::new());
    assert!(ReportWorkflow::reopen(&report, &outsider).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Approval is only reachable from Submitted, whatever the actor.
    #[test]
    fn prop_approved_only_via_submitted(status in prop_oneof![
        Just(ReportStatus::Draft),
        Just(ReportStatus::Submitted),
        Just(ReportStatus::Approved),
        Just(ReportStatus::Rejected),
    ]) {
        let church = ChurchId::new();
        let mut report = draft_report(church, income(dec!(1000), dec!(0)));
        report.status = status;

        let result = ReportWorkflow::approve(
            &report,
            &treasurer(),
            FundId::new(),
            FundId::new(),
        );
        prop_assert_eq!(result.is_ok(), status == ReportStatus::Submitted);
    }

    /// The generated allocation batch always balances.
    #[test]
    fn prop_approval_batch_balances(
        tithes in 0i64..100_000_000i64,
        offerings in 0i64..100_000_000i64,
        designated in 0i64..10_000_000i64,
    ) {
        let church = ChurchId::new();
        let mut inc = income(Decimal::from(tithes), Decimal::from(offerings));
        inc.designated.push(DesignatedLine {
            fund_id: FundId::new(),
            description: "Campaña".to_string(),
            amount: Decimal::from(designated),
        });
        let report = submitted_report(church, inc);

        let action = ReportWorkflow::approve(
            &report,
            &treasurer(),
            FundId::new(),
            FundId::new(),
        ).unwrap();

        if let ReportAction::Approve { allocation_entries, .. } = action {
            if !allocation_entries.is_empty() {
                prop_assert!(validate_batch(&allocation_entries).is_ok());
            }
        }
    }
}
