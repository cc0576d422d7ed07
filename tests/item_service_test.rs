//! Integration tests for the asset register: uniqueness constraints,
//! soft delete/restore, the category deletion guard and idempotent QR
//! derivation.

mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use common::TestApp;
use custodia_api::{
    entities::item::ItemCondition,
    errors::ServiceError,
    services::items::{qr_payload, NewItem},
};
use rust_decimal_macros::dec;

fn new_item(pn: &str, category_id: uuid::Uuid, location_id: uuid::Uuid) -> NewItem {
    NewItem {
        property_number: pn.to_string(),
        serial_number: None,
        barcode: None,
        name: format!("Item {}", pn),
        description: None,
        condition: ItemCondition::Good,
        acquisition_cost: dec!(750.00),
        acquisition_date: Utc::now(),
        warranty_expiry: None,
        category_id,
        location_id,
    }
}

#[tokio::test]
async fn duplicate_property_number_conflicts() {
    let app = TestApp::new().await;
    let cat = app.seed_category("CAT-UNIQ").await;
    let loc = app.seed_location("LOC-UNIQ").await;

    app.state
        .services
        .items
        .create_item(new_item("PN-UNIQ-1", cat.id, loc.id))
        .await
        .expect("first item");

    let err = app
        .state
        .services
        .items
        .create_item(new_item("PN-UNIQ-1", cat.id, loc.id))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn duplicate_serial_number_conflicts_excluding_own_row() {
    let app = TestApp::new().await;
    let cat = app.seed_category("CAT-SER").await;
    let loc = app.seed_location("LOC-SER").await;

    let mut first = new_item("PN-SER-1", cat.id, loc.id);
    first.serial_number = Some("SN-777".to_string());
    let created = app
        .state
        .services
        .items
        .create_item(first)
        .await
        .expect("first item");

    let mut second = new_item("PN-SER-2", cat.id, loc.id);
    second.serial_number = Some("SN-777".to_string());
    let err = app
        .state
        .services
        .items
        .create_item(second)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));

    // Re-saving the same row with its own serial is not a conflict.
    let unchanged = app
        .state
        .services
        .items
        .update_item(
            created.id,
            custodia_api::services::items::ItemChanges {
                serial_number: Some(Some("SN-777".to_string())),
                ..Default::default()
            },
        )
        .await
        .expect("self update");
    assert_eq!(unchanged.serial_number.as_deref(), Some("SN-777"));
}

#[tokio::test]
async fn generate_qr_is_idempotent() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-QR-001").await;

    let first = app
        .state
        .services
        .items
        .generate_qr(item.id)
        .await
        .expect("first generation");
    let code = first.qr_code.clone().expect("qr code set");
    assert_eq!(code, qr_payload("PN-QR-001"));

    let second = app
        .state
        .services
        .items
        .generate_qr(item.id)
        .await
        .expect("second generation");
    assert_eq!(second.qr_code.as_deref(), Some(code.as_str()));
    assert_eq!(second.updated_at, first.updated_at);
}

#[tokio::test]
async fn soft_delete_hides_and_restore_preserves_status() {
    let app = TestApp::new().await;
    let item = app.seed_item("PN-DEL-001").await;

    let deleted = app
        .state
        .services
        .items
        .delete_item(item.id)
        .await
        .expect("delete");
    assert!(deleted.deleted_at.is_some());

    // Hidden from default queries, reachable with trashed opt-in.
    let err = app.state.services.items.get_item(item.id).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
    let trashed = app
        .state
        .services
        .items
        .get_item_with_trashed(item.id)
        .await
        .expect("with trashed");
    assert!(trashed.deleted_at.is_some());

    let restored = app
        .state
        .services
        .items
        .restore_item(item.id)
        .await
        .expect("restore");
    assert!(restored.deleted_at.is_none());
    assert_eq!(restored.status, item.status);
}

#[tokio::test]
async fn category_with_items_cannot_be_deleted() {
    let app = TestApp::new().await;
    let cat = app.seed_category("CAT-GUARD").await;
    let loc = app.seed_location("LOC-GUARD").await;

    app.state
        .services
        .items
        .create_item(new_item("PN-GUARD-1", cat.id, loc.id))
        .await
        .expect("item in category");

    let err = app
        .state
        .services
        .categories
        .delete_category(cat.id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));

    // Still live.
    let still = app
        .state
        .services
        .categories
        .get_category(cat.id)
        .await
        .expect("category");
    assert!(still.deleted_at.is_none());
}

#[tokio::test]
async fn empty_category_deletes_and_restores() {
    let app = TestApp::new().await;
    let cat = app.seed_category("CAT-EMPTY").await;

    let deleted = app
        .state
        .services
        .categories
        .delete_category(cat.id)
        .await
        .expect("delete");
    assert!(deleted.deleted_at.is_some());

    let restored = app
        .state
        .services
        .categories
        .restore_category(cat.id)
        .await
        .expect("restore");
    assert!(restored.deleted_at.is_none());
}

#[tokio::test]
async fn duplicate_category_code_conflicts() {
    let app = TestApp::new().await;
    app.seed_category("CAT-DUP").await;

    let err = app
        .state
        .services
        .categories
        .create_category("CAT-DUP".to_string(), "Duplicate".to_string(), None)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}
