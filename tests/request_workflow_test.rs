//! Integration tests for the generic request workflow: submission,
//! review verdicts, completion, cancellation, ownership boundaries and
//! comment visibility.

mod common;

use assert_matches::assert_matches;
use common::TestApp;
use custodia_api::{
    commands::requests::{
        AddCommentCommand, ApproveRequestCommand, CancelRequestCommand, CompleteRequestCommand,
        RejectRequestCommand, RequestChangesCommand, StartReviewCommand, SubmitRequestCommand,
        UpdateRequestCommand,
    },
    entities::request::{self, RequestPriority, RequestStatus, RequestType},
    errors::ServiceError,
};

async fn submitted_request(
    app: &TestApp,
    owner: &custodia_api::auth::AuthUser,
) -> request::Model {
    app.state
        .services
        .requests
        .submit_request(SubmitRequestCommand {
            actor: owner.clone(),
            request_type: RequestType::Purchase,
            item_id: None,
            title: "Replacement dock".to_string(),
            description: "Current dock no longer charges".to_string(),
            priority: RequestPriority::Medium,
        })
        .await
        .expect("submit request")
}

#[tokio::test]
async fn review_flow_reaches_completion() {
    let app = TestApp::new().await;
    let (_, owner) = app.seed_user("Olive Owner", "custodian").await;
    let (_, reviewer) = app.seed_user("Rhea Reviewer", "department_head").await;
    let (_, fulfiller) = app.seed_user("Frank Fulfiller", "procurement_officer").await;

    let request = submitted_request(&app, &owner).await;
    assert_eq!(request.status, RequestStatus::Pending);

    let under_review = app
        .state
        .services
        .requests
        .start_review(StartReviewCommand {
            actor: reviewer.clone(),
            request_id: request.id,
        })
        .await
        .expect("start review");
    assert_eq!(under_review.status, RequestStatus::UnderReview);

    let approved = app
        .state
        .services
        .requests
        .approve_request(ApproveRequestCommand {
            actor: reviewer.clone(),
            request_id: request.id,
            review_notes: None,
        })
        .await
        .expect("approve");
    assert_eq!(approved.status, RequestStatus::Approved);
    assert_eq!(approved.reviewed_by, Some(reviewer.id));
    assert!(approved.reviewed_at.is_some());

    let completed = app
        .state
        .services
        .requests
        .complete_request(CompleteRequestCommand {
            actor: fulfiller,
            request_id: request.id,
        })
        .await
        .expect("complete");
    assert_eq!(completed.status, RequestStatus::Completed);
    assert!(completed.completed_at.is_some());

    // Terminal: cancellation is now blocked.
    let err = app
        .state
        .services
        .requests
        .cancel_request(CancelRequestCommand {
            actor: owner,
            request_id: request.id,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}

#[tokio::test]
async fn rejection_with_empty_notes_fails_and_leaves_status_pending() {
    let app = TestApp::new().await;
    let (_, owner) = app.seed_user("Nellie Notes", "custodian").await;
    let (_, reviewer) = app.seed_user("Ned Reviewer", "department_head").await;

    let request = submitted_request(&app, &owner).await;

    let err = app
        .state
        .services
        .requests
        .reject_request(RejectRequestCommand {
            actor: reviewer,
            request_id: request.id,
            review_notes: String::new(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let unchanged = app
        .state
        .services
        .requests
        .get_request(request.id)
        .await
        .expect("request");
    assert_eq!(unchanged.status, RequestStatus::Pending);
}

#[tokio::test]
async fn non_owner_without_permission_cannot_edit_any_status() {
    let app = TestApp::new().await;
    let (_, owner) = app.seed_user("Edna Owner", "custodian").await;
    let (_, outsider) = app.seed_user("Oscar Outsider", "custodian").await;

    let request = submitted_request(&app, &owner).await;

    let err = app
        .state
        .services
        .requests
        .update_request(UpdateRequestCommand {
            actor: outsider,
            request_id: request.id,
            title: Some("Hijacked".to_string()),
            description: None,
            priority: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Forbidden(_));
}

#[tokio::test]
async fn editing_a_changes_requested_request_reopens_it() {
    let app = TestApp::new().await;
    let (_, owner) = app.seed_user("Rita Redo", "custodian").await;
    let (_, reviewer) = app.seed_user("Rick Reviewer", "department_head").await;

    let request = submitted_request(&app, &owner).await;

    let sent_back = app
        .state
        .services
        .requests
        .request_changes(RequestChangesCommand {
            actor: reviewer,
            request_id: request.id,
            review_notes: "Add a cost estimate".to_string(),
        })
        .await
        .expect("request changes");
    assert_eq!(sent_back.status, RequestStatus::ChangesRequested);

    let reopened = app
        .state
        .services
        .requests
        .update_request(UpdateRequestCommand {
            actor: owner,
            request_id: request.id,
            title: None,
            description: Some("Dock broken; replacement quote attached".to_string()),
            priority: None,
        })
        .await
        .expect("owner edit");
    assert_eq!(reopened.status, RequestStatus::Pending);
}

#[tokio::test]
async fn owner_can_cancel_even_after_rejection() {
    let app = TestApp::new().await;
    let (_, owner) = app.seed_user("Cora Cancel", "custodian").await;
    let (_, reviewer) = app.seed_user("Carl Reviewer", "department_head").await;

    let request = submitted_request(&app, &owner).await;

    app.state
        .services
        .requests
        .reject_request(RejectRequestCommand {
            actor: reviewer,
            request_id: request.id,
            review_notes: "Out of budget this quarter".to_string(),
        })
        .await
        .expect("reject");

    let cancelled = app
        .state
        .services
        .requests
        .cancel_request(CancelRequestCommand {
            actor: owner,
            request_id: request.id,
        })
        .await
        .expect("cancel after rejection");
    assert_eq!(cancelled.status, RequestStatus::Cancelled);
}

#[tokio::test]
async fn internal_comments_are_hidden_from_non_reviewers() {
    let app = TestApp::new().await;
    let (_, owner) = app.seed_user("Callie Commenter", "custodian").await;
    let (_, reviewer) = app.seed_user("Cesar Reviewer", "department_head").await;

    let request = submitted_request(&app, &owner).await;

    app.state
        .services
        .requests
        .add_comment(AddCommentCommand {
            actor: owner.clone(),
            request_id: request.id,
            comment: "Any update on this?".to_string(),
            is_internal: false,
        })
        .await
        .expect("public comment");

    app.state
        .services
        .requests
        .add_comment(AddCommentCommand {
            actor: reviewer.clone(),
            request_id: request.id,
            comment: "Budget check pending with finance".to_string(),
            is_internal: true,
        })
        .await
        .expect("internal comment");

    let for_owner = app
        .state
        .services
        .requests
        .list_comments(request.id, &owner)
        .await
        .expect("owner view");
    assert_eq!(for_owner.len(), 1);

    let for_reviewer = app
        .state
        .services
        .requests
        .list_comments(request.id, &reviewer)
        .await
        .expect("reviewer view");
    assert_eq!(for_reviewer.len(), 2);
}

#[tokio::test]
async fn owner_cannot_flag_comments_internal() {
    let app = TestApp::new().await;
    let (_, owner) = app.seed_user("Ivy Internal", "custodian").await;
    let request = submitted_request(&app, &owner).await;

    let err = app
        .state
        .services
        .requests
        .add_comment(AddCommentCommand {
            actor: owner,
            request_id: request.id,
            comment: "Sneaky internal note".to_string(),
            is_internal: true,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Forbidden(_));
}
