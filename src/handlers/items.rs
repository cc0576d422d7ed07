use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{consts as perm, policy, AuthUser},
    entities::item::{self, ItemCondition, ItemStatus},
    errors::ServiceError,
    services::items::{ItemChanges, NewItem},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct ItemListQuery {
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub limit: Option<u64>,
    /// Optional status filter
    pub status: Option<ItemStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 64, message = "Property number must be 1-64 characters"))]
    pub property_number: String,
    pub serial_number: Option<String>,
    pub barcode: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub condition: ItemCondition,
    pub acquisition_cost: Decimal,
    pub acquisition_date: DateTime<Utc>,
    pub warranty_expiry: Option<DateTime<Utc>>,
    pub category_id: Uuid,
    pub location_id: Uuid,
}

/// Absent fields are left untouched; there is no way to blank a field
/// through this endpoint.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 64, message = "Property number must be 1-64 characters"))]
    pub property_number: Option<String>,
    pub serial_number: Option<String>,
    pub barcode: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub condition: Option<ItemCondition>,
    pub location_id: Option<Uuid>,
    pub warranty_expiry: Option<DateTime<Utc>>,
}

pub async fn list_items(
    State(state): State<AppState>,
    actor: AuthUser,
    Query(query): Query<ItemListQuery>,
) -> ApiResult<PaginatedResponse<item::Model>> {
    policy::authorize(&actor, perm::ITEMS_READ)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (items, total) = state
        .services
        .items
        .list_items(page, limit, query.status)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

pub async fn get_item(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<item::Model> {
    policy::authorize(&actor, perm::ITEMS_READ)?;
    let item = state.services.items.get_item(id).await?;
    Ok(Json(ApiResponse::success(item)))
}

pub async fn create_item(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(payload): Json<CreateItemRequest>,
) -> ApiResult<item::Model> {
    policy::authorize(&actor, perm::ITEMS_CREATE)?;
    payload.validate().map_err(ServiceError::from)?;

    let created = state
        .services
        .items
        .create_item(NewItem {
            property_number: payload.property_number,
            serial_number: payload.serial_number,
            barcode: payload.barcode,
            name: payload.name,
            description: payload.description,
            condition: payload.condition,
            acquisition_cost: payload.acquisition_cost,
            acquisition_date: payload.acquisition_date,
            warranty_expiry: payload.warranty_expiry,
            category_id: payload.category_id,
            location_id: payload.location_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(created)))
}

pub async fn update_item(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> ApiResult<item::Model> {
    policy::authorize(&actor, perm::ITEMS_UPDATE)?;
    payload.validate().map_err(ServiceError::from)?;

    let updated = state
        .services
        .items
        .update_item(
            id,
            ItemChanges {
                property_number: payload.property_number,
                serial_number: payload.serial_number.map(Some),
                barcode: payload.barcode.map(Some),
                name: payload.name,
                description: payload.description.map(Some),
                condition: payload.condition,
                location_id: payload.location_id,
                warranty_expiry: payload.warranty_expiry.map(Some),
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}

pub async fn delete_item(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<item::Model> {
    policy::authorize(&actor, perm::ITEMS_DELETE)?;
    let deleted = state.services.items.delete_item(id).await?;
    Ok(Json(ApiResponse::success(deleted)))
}

pub async fn restore_item(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<item::Model> {
    policy::authorize(&actor, perm::ITEMS_RESTORE)?;
    let restored = state.services.items.restore_item(id).await?;
    Ok(Json(ApiResponse::success(restored)))
}

pub async fn generate_qr(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<item::Model> {
    policy::authorize(&actor, perm::ITEMS_UPDATE)?;
    let item = state.services.items.generate_qr(id).await?;
    Ok(Json(ApiResponse::success(item)))
}
