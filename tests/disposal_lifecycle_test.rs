//! Integration tests for the disposal lifecycle:
//! request -> approve -> execute, with the item status side effects and
//! every refused shortcut along the way.

mod common;

use assert_matches::assert_matches;
use common::TestApp;
use custodia_api::{
    commands::disposals::{
        ApproveDisposalCommand, CreateDisposalCommand, ExecuteDisposalCommand,
        RejectDisposalCommand,
    },
    entities::{
        disposal::{DisposalMethod, DisposalStatus},
        item::ItemStatus,
    },
    errors::ServiceError,
};
use rust_decimal_macros::dec;

#[tokio::test]
async fn full_disposal_round_trip_marks_item_disposed() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-DSP-001").await;
    let (_, officer) = app.seed_user("Dana Officer", "disposal_officer").await;

    let disposal = app
        .state
        .services
        .disposals
        .create_disposal(CreateDisposalCommand {
            actor: officer.clone(),
            item_id: item.id,
            reason: "Beyond economical repair".to_string(),
            disposal_method: DisposalMethod::Recycling,
            notes: None,
        })
        .await
        .expect("create disposal");
    assert_eq!(disposal.status, DisposalStatus::Pending);

    let approved = app
        .state
        .services
        .disposals
        .approve_disposal(ApproveDisposalCommand {
            actor: officer.clone(),
            disposal_id: disposal.id,
            notes: None,
        })
        .await
        .expect("approve disposal");
    assert_eq!(approved.status, DisposalStatus::Approved);
    assert!(approved.approved_at.is_some());
    assert_eq!(approved.approved_by, Some(officer.id));

    let mid = app
        .state
        .services
        .items
        .get_item(item.id)
        .await
        .expect("item");
    assert_eq!(mid.status, ItemStatus::PendingDisposal);

    let executed = app
        .state
        .services
        .disposals
        .execute_disposal(ExecuteDisposalCommand {
            actor: officer.clone(),
            disposal_id: disposal.id,
            proceeds: Some(dec!(25.00)),
            notes: None,
        })
        .await
        .expect("execute disposal");
    assert_eq!(executed.status, DisposalStatus::Executed);
    assert!(executed.executed_at.is_some());
    assert_eq!(executed.proceeds, Some(dec!(25.00)));

    let done = app
        .state
        .services
        .items
        .get_item(item.id)
        .await
        .expect("item");
    assert_eq!(done.status, ItemStatus::Disposed);

    // Executing again must be refused.
    let err = app
        .state
        .services
        .disposals
        .execute_disposal(ExecuteDisposalCommand {
            actor: officer,
            disposal_id: disposal.id,
            proceeds: None,
            notes: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}

#[tokio::test]
async fn execution_cannot_skip_approval() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-DSP-002").await;
    let (_, officer) = app.seed_user("Skip Officer", "disposal_officer").await;

    let disposal = app
        .state
        .services
        .disposals
        .create_disposal(CreateDisposalCommand {
            actor: officer.clone(),
            item_id: item.id,
            reason: "Obsolete".to_string(),
            disposal_method: DisposalMethod::Destruction,
            notes: None,
        })
        .await
        .expect("create disposal");

    let err = app
        .state
        .services
        .disposals
        .execute_disposal(ExecuteDisposalCommand {
            actor: officer,
            disposal_id: disposal.id,
            proceeds: None,
            notes: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}

#[tokio::test]
async fn rejection_requires_a_reason() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-DSP-003").await;
    let (_, officer) = app.seed_user("Reason Officer", "disposal_officer").await;

    let disposal = app
        .state
        .services
        .disposals
        .create_disposal(CreateDisposalCommand {
            actor: officer.clone(),
            item_id: item.id,
            reason: "Damaged in transit".to_string(),
            disposal_method: DisposalMethod::Donation,
            notes: None,
        })
        .await
        .expect("create disposal");

    let err = app
        .state
        .services
        .disposals
        .reject_disposal(RejectDisposalCommand {
            actor: officer.clone(),
            disposal_id: disposal.id,
            rejection_reason: String::new(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    // Status is untouched by the failed verdict.
    let unchanged = app
        .state
        .services
        .disposals
        .get_disposal(disposal.id)
        .await
        .expect("disposal");
    assert_eq!(unchanged.status, DisposalStatus::Pending);

    let rejected = app
        .state
        .services
        .disposals
        .reject_disposal(RejectDisposalCommand {
            actor: officer,
            disposal_id: disposal.id,
            rejection_reason: "Asset still serviceable".to_string(),
        })
        .await
        .expect("reject");
    assert_eq!(rejected.status, DisposalStatus::Rejected);
    assert!(rejected.rejected_at.is_some());
}

#[tokio::test]
async fn one_live_disposal_per_item() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-DSP-004").await;
    let (_, officer) = app.seed_user("Dup Officer", "disposal_officer").await;

    app.state
        .services
        .disposals
        .create_disposal(CreateDisposalCommand {
            actor: officer.clone(),
            item_id: item.id,
            reason: "First request".to_string(),
            disposal_method: DisposalMethod::Sale,
            notes: None,
        })
        .await
        .expect("first disposal");

    let err = app
        .state
        .services
        .disposals
        .create_disposal(CreateDisposalCommand {
            actor: officer,
            item_id: item.id,
            reason: "Second request".to_string(),
            disposal_method: DisposalMethod::Sale,
            notes: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn custodian_cannot_approve_disposals() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-DSP-005").await;
    let (_, officer) = app.seed_user("Create Officer", "disposal_officer").await;
    let custodian = app.actor_with_role("custodian");

    let disposal = app
        .state
        .services
        .disposals
        .create_disposal(CreateDisposalCommand {
            actor: officer,
            item_id: item.id,
            reason: "Old".to_string(),
            disposal_method: DisposalMethod::Recycling,
            notes: None,
        })
        .await
        .expect("create");

    let err = app
        .state
        .services
        .disposals
        .approve_disposal(ApproveDisposalCommand {
            actor: custodian,
            disposal_id: disposal.id,
            notes: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Forbidden(_));
}
