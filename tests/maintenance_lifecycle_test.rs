//! Integration tests for the maintenance lifecycle:
//! pending -> scheduled -> in_progress -> completed, with the item
//! snapshot/restore side effects.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use common::TestApp;
use custodia_api::{
    commands::maintenance::{
        CancelMaintenanceCommand, CompleteMaintenanceCommand, CreateMaintenanceCommand,
        ScheduleMaintenanceCommand, StartMaintenanceCommand,
    },
    entities::{
        item::{ItemCondition, ItemStatus},
        maintenance::{MaintenancePriority, MaintenanceStatus, MaintenanceType},
    },
    errors::ServiceError,
};

#[tokio::test]
async fn maintenance_cycle_updates_item_condition() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-MNT-001").await;
    let (_, manager) = app.seed_user("Mia Manager", "asset_manager").await;
    let (_, tech) = app.seed_user("Tom Tech", "maintenance_tech").await;

    let record = app
        .state
        .services
        .maintenance
        .create_maintenance(CreateMaintenanceCommand {
            actor: manager,
            item_id: item.id,
            maintenance_type: MaintenanceType::Corrective,
            priority: MaintenancePriority::High,
            description: "Fan rattles under load".to_string(),
        })
        .await
        .expect("create");
    assert_eq!(record.status, MaintenanceStatus::Pending);

    let scheduled = app
        .state
        .services
        .maintenance
        .schedule_maintenance(ScheduleMaintenanceCommand {
            actor: tech.clone(),
            maintenance_id: record.id,
            scheduled_date: Utc::now() + Duration::days(2),
            assigned_to: Some(tech.id),
        })
        .await
        .expect("schedule");
    assert_eq!(scheduled.status, MaintenanceStatus::Scheduled);

    let started = app
        .state
        .services
        .maintenance
        .start_maintenance(StartMaintenanceCommand {
            actor: tech.clone(),
            maintenance_id: record.id,
        })
        .await
        .expect("start");
    assert_eq!(started.status, MaintenanceStatus::InProgress);
    assert!(started.started_at.is_some());
    assert_eq!(started.pre_status, Some(ItemStatus::Available));
    assert_eq!(started.pre_condition, Some(ItemCondition::Good));

    let under = app.state.services.items.get_item(item.id).await.unwrap();
    assert_eq!(under.status, ItemStatus::UnderMaintenance);

    let completed = app
        .state
        .services
        .maintenance
        .complete_maintenance(CompleteMaintenanceCommand {
            actor: tech,
            maintenance_id: record.id,
            item_status: None,
            item_condition: Some(ItemCondition::Excellent),
            cost: None,
        })
        .await
        .expect("complete");
    assert_eq!(completed.status, MaintenanceStatus::Completed);
    assert!(completed.completed_at.is_some());
    assert!(completed.actual_duration_hours.is_some());

    // Status defaults back to the snapshot, condition from the payload.
    let serviced = app.state.services.items.get_item(item.id).await.unwrap();
    assert_eq!(serviced.status, ItemStatus::Available);
    assert_eq!(serviced.condition, ItemCondition::Excellent);
}

#[tokio::test]
async fn scheduling_in_the_past_is_rejected() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-MNT-002").await;
    let (_, manager) = app.seed_user("Past Manager", "asset_manager").await;
    let (_, tech) = app.seed_user("Past Tech", "maintenance_tech").await;

    let record = app
        .state
        .services
        .maintenance
        .create_maintenance(CreateMaintenanceCommand {
            actor: manager,
            item_id: item.id,
            maintenance_type: MaintenanceType::Inspection,
            priority: MaintenancePriority::Low,
            description: "Annual check".to_string(),
        })
        .await
        .expect("create");

    let err = app
        .state
        .services
        .maintenance
        .schedule_maintenance(ScheduleMaintenanceCommand {
            actor: tech,
            maintenance_id: record.id,
            scheduled_date: Utc::now() - Duration::hours(1),
            assigned_to: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn work_cannot_start_before_scheduling() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-MNT-003").await;
    let (_, manager) = app.seed_user("Eager Manager", "asset_manager").await;
    let (_, tech) = app.seed_user("Eager Tech", "maintenance_tech").await;

    let record = app
        .state
        .services
        .maintenance
        .create_maintenance(CreateMaintenanceCommand {
            actor: manager,
            item_id: item.id,
            maintenance_type: MaintenanceType::Preventive,
            priority: MaintenancePriority::Medium,
            description: "Quarterly service".to_string(),
        })
        .await
        .expect("create");

    let err = app
        .state
        .services
        .maintenance
        .start_maintenance(StartMaintenanceCommand {
            actor: tech,
            maintenance_id: record.id,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}

#[tokio::test]
async fn cancelling_started_work_restores_the_item_snapshot() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-MNT-004").await;
    let (_, manager) = app.seed_user("Undo Manager", "asset_manager").await;
    let (_, tech) = app.seed_user("Undo Tech", "maintenance_tech").await;

    let record = app
        .state
        .services
        .maintenance
        .create_maintenance(CreateMaintenanceCommand {
            actor: manager,
            item_id: item.id,
            maintenance_type: MaintenanceType::Calibration,
            priority: MaintenancePriority::Urgent,
            description: "Sensor drift".to_string(),
        })
        .await
        .expect("create");
    app.state
        .services
        .maintenance
        .schedule_maintenance(ScheduleMaintenanceCommand {
            actor: tech.clone(),
            maintenance_id: record.id,
            scheduled_date: Utc::now() + Duration::days(1),
            assigned_to: Some(tech.id),
        })
        .await
        .expect("schedule");
    app.state
        .services
        .maintenance
        .start_maintenance(StartMaintenanceCommand {
            actor: tech.clone(),
            maintenance_id: record.id,
        })
        .await
        .expect("start");

    let cancelled = app
        .state
        .services
        .maintenance
        .cancel_maintenance(CancelMaintenanceCommand {
            actor: tech,
            maintenance_id: record.id,
        })
        .await
        .expect("cancel");
    assert_eq!(cancelled.status, MaintenanceStatus::Cancelled);

    let restored = app.state.services.items.get_item(item.id).await.unwrap();
    assert_eq!(restored.status, ItemStatus::Available);
    assert_eq!(restored.condition, ItemCondition::Good);
}

#[tokio::test]
async fn completed_work_cannot_be_cancelled() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-MNT-005").await;
    let (_, manager) = app.seed_user("Done Manager", "asset_manager").await;
    let (_, tech) = app.seed_user("Done Tech", "maintenance_tech").await;

    let record = app
        .state
        .services
        .maintenance
        .create_maintenance(CreateMaintenanceCommand {
            actor: manager,
            item_id: item.id,
            maintenance_type: MaintenanceType::Corrective,
            priority: MaintenancePriority::Low,
            description: "Loose hinge".to_string(),
        })
        .await
        .expect("create");
    app.state
        .services
        .maintenance
        .schedule_maintenance(ScheduleMaintenanceCommand {
            actor: tech.clone(),
            maintenance_id: record.id,
            scheduled_date: Utc::now() + Duration::days(1),
            assigned_to: None,
        })
        .await
        .expect("schedule");
    app.state
        .services
        .maintenance
        .start_maintenance(StartMaintenanceCommand {
            actor: tech.clone(),
            maintenance_id: record.id,
        })
        .await
        .expect("start");
    app.state
        .services
        .maintenance
        .complete_maintenance(CompleteMaintenanceCommand {
            actor: tech.clone(),
            maintenance_id: record.id,
            item_status: None,
            item_condition: None,
            cost: None,
        })
        .await
        .expect("complete");

    let err = app
        .state
        .services
        .maintenance
        .cancel_maintenance(CancelMaintenanceCommand {
            actor: tech,
            maintenance_id: record.id,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidTransition { .. });
}
