use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    commands::maintenance::{
        CancelMaintenanceCommand, CompleteMaintenanceCommand, CreateMaintenanceCommand,
        ScheduleMaintenanceCommand, StartMaintenanceCommand,
    },
    entities::{
        item::{ItemCondition, ItemStatus},
        maintenance::{self, MaintenancePriority, MaintenanceStatus, MaintenanceType},
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct MaintenanceListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<MaintenanceStatus>,
    pub item_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMaintenanceRequest {
    pub item_id: Uuid,
    pub maintenance_type: MaintenanceType,
    pub priority: MaintenancePriority,
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduleMaintenanceRequest {
    pub scheduled_date: DateTime<Utc>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct CompleteMaintenanceRequest {
    pub item_status: Option<ItemStatus>,
    pub item_condition: Option<ItemCondition>,
    pub cost: Option<Decimal>,
}

pub async fn list_maintenance(
    State(state): State<AppState>,
    actor: AuthUser,
    Query(query): Query<MaintenanceListQuery>,
) -> ApiResult<PaginatedResponse<maintenance::Model>> {
    crate::auth::authorize(&actor, crate::auth::consts::MAINTENANCE_READ)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (rows, total) = state
        .services
        .maintenance
        .list_maintenance(page, limit, query.status, query.item_id)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        rows, total, page, limit,
    ))))
}

pub async fn get_maintenance(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<maintenance::Model> {
    crate::auth::authorize(&actor, crate::auth::consts::MAINTENANCE_READ)?;
    let row = state.services.maintenance.get_maintenance(id).await?;
    Ok(Json(ApiResponse::success(row)))
}

pub async fn create_maintenance(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(payload): Json<CreateMaintenanceRequest>,
) -> ApiResult<maintenance::Model> {
    let command = CreateMaintenanceCommand {
        actor,
        item_id: payload.item_id,
        maintenance_type: payload.maintenance_type,
        priority: payload.priority,
        description: payload.description,
    };
    let created = state.services.maintenance.create_maintenance(command).await?;
    Ok(Json(ApiResponse::success(created)))
}

pub async fn schedule_maintenance(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleMaintenanceRequest>,
) -> ApiResult<maintenance::Model> {
    let command = ScheduleMaintenanceCommand {
        actor,
        maintenance_id: id,
        scheduled_date: payload.scheduled_date,
        assigned_to: payload.assigned_to,
    };
    let updated = state
        .services
        .maintenance
        .schedule_maintenance(command)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn start_maintenance(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<maintenance::Model> {
    let command = StartMaintenanceCommand {
        actor,
        maintenance_id: id,
    };
    let updated = state.services.maintenance.start_maintenance(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn complete_maintenance(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteMaintenanceRequest>,
) -> ApiResult<maintenance::Model> {
    let command = CompleteMaintenanceCommand {
        actor,
        maintenance_id: id,
        item_status: payload.item_status,
        item_condition: payload.item_condition,
        cost: payload.cost,
    };
    let updated = state
        .services
        .maintenance
        .complete_maintenance(command)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn cancel_maintenance(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<maintenance::Model> {
    let command = CancelMaintenanceCommand {
        actor,
        maintenance_id: id,
    };
    let updated = state.services.maintenance.cancel_maintenance(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}
