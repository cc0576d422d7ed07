//! Integration tests for return inspection:
//! pending_inspection -> inspected -> approved/rejected, with the item
//! condition write-back on approval.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use common::TestApp;
use custodia_api::{
    auth::AuthUser,
    commands::assignments::{
        ActivateAssignmentCommand, ApproveAssignmentCommand, CreateAssignmentCommand,
        ReturnAssignmentCommand,
    },
    commands::returns::{ApproveReturnCommand, InspectReturnCommand, RejectReturnCommand},
    entities::{
        item::{ItemCondition, ItemStatus},
        item_return::{self, ReturnStatus},
    },
    errors::ServiceError,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

async fn returned_assignment(app: &TestApp, pn: &str) -> (Uuid, item_return::Model, AuthUser) {
    let item = app.seed_item(pn).await;
    let (custodian_row, _) = app.seed_user(&format!("Holder {}", pn), "custodian").await;
    let (_, manager) = app.seed_user(&format!("Manager {}", pn), "asset_manager").await;

    let assignment = app
        .state
        .services
        .assignments
        .create_assignment(CreateAssignmentCommand {
            actor: manager.clone(),
            item_id: item.id,
            user_id: custodian_row.id,
            due_date: Some(Utc::now() + Duration::days(30)),
            notes: None,
        })
        .await
        .expect("create");
    app.state
        .services
        .assignments
        .approve_assignment(ApproveAssignmentCommand {
            actor: manager.clone(),
            assignment_id: assignment.id,
            notes: None,
        })
        .await
        .expect("approve");
    app.state
        .services
        .assignments
        .activate_assignment(ActivateAssignmentCommand {
            actor: manager.clone(),
            assignment_id: assignment.id,
        })
        .await
        .expect("activate");

    let result = app
        .state
        .services
        .assignments
        .return_assignment(ReturnAssignmentCommand {
            actor: manager.clone(),
            assignment_id: assignment.id,
            return_date: None,
            notes: None,
        })
        .await
        .expect("return");

    let (_, inspector) = app
        .seed_user(&format!("Inspector {}", pn), "inspector")
        .await;
    (item.id, result.item_return, inspector)
}

#[tokio::test]
async fn approved_inspection_writes_condition_back_to_item() {
    let app = TestApp::new().await;
    let (item_id, opened, inspector) = returned_assignment(&app, "PN-RET-001").await;
    assert_eq!(opened.status, ReturnStatus::PendingInspection);

    let inspected = app
        .state
        .services
        .returns
        .inspect_return(InspectReturnCommand {
            actor: inspector.clone(),
            return_id: opened.id,
            condition_on_return: ItemCondition::Damaged,
            is_damaged: true,
            penalty_amount: Some(dec!(50.00)),
            notes: Some("Cracked casing".to_string()),
        })
        .await
        .expect("inspect");
    assert_eq!(inspected.status, ReturnStatus::Inspected);
    assert!(inspected.is_damaged);
    assert_eq!(inspected.penalty_amount, dec!(50.00));
    assert!(inspected.inspected_at.is_some());

    let approved = app
        .state
        .services
        .returns
        .approve_return(ApproveReturnCommand {
            actor: inspector,
            return_id: opened.id,
            notes: None,
        })
        .await
        .expect("approve");
    assert_eq!(approved.status, ReturnStatus::Approved);

    let released = app.state.services.items.get_item(item_id).await.unwrap();
    assert_eq!(released.status, ItemStatus::Available);
    assert_eq!(released.condition, ItemCondition::Damaged);
}

#[tokio::test]
async fn approval_requires_prior_inspection() {
    let app = TestApp::new().await;
    let (_, opened, inspector) = returned_assignment(&app, "PN-RET-002").await;

    let err = app
        .state
        .services
        .returns
        .approve_return(ApproveReturnCommand {
            actor: inspector,
            return_id: opened.id,
            notes: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}

#[tokio::test]
async fn rejection_requires_notes_and_keeps_item_assigned() {
    let app = TestApp::new().await;
    let (item_id, opened, inspector) = returned_assignment(&app, "PN-RET-003").await;

    app.state
        .services
        .returns
        .inspect_return(InspectReturnCommand {
            actor: inspector.clone(),
            return_id: opened.id,
            condition_on_return: ItemCondition::Poor,
            is_damaged: false,
            penalty_amount: None,
            notes: None,
        })
        .await
        .expect("inspect");

    let err = app
        .state
        .services
        .returns
        .reject_return(RejectReturnCommand {
            actor: inspector.clone(),
            return_id: opened.id,
            notes: String::new(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let rejected = app
        .state
        .services
        .returns
        .reject_return(RejectReturnCommand {
            actor: inspector,
            return_id: opened.id,
            notes: "Wrong accessories returned".to_string(),
        })
        .await
        .expect("reject");
    assert_eq!(rejected.status, ReturnStatus::Rejected);

    // A rejected return does not release the item.
    let held = app.state.services.items.get_item(item_id).await.unwrap();
    assert_eq!(held.status, ItemStatus::Assigned);
}

#[tokio::test]
async fn double_inspection_is_refused() {
    let app = TestApp::new().await;
    let (_, opened, inspector) = returned_assignment(&app, "PN-RET-004").await;

    app.state
        .services
        .returns
        .inspect_return(InspectReturnCommand {
            actor: inspector.clone(),
            return_id: opened.id,
            condition_on_return: ItemCondition::Good,
            is_damaged: false,
            penalty_amount: None,
            notes: None,
        })
        .await
        .expect("first inspection");

    let err = app
        .state
        .services
        .returns
        .inspect_return(InspectReturnCommand {
            actor: inspector,
            return_id: opened.id,
            condition_on_return: ItemCondition::Good,
            is_damaged: false,
            penalty_amount: None,
            notes: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}
