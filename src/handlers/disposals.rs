use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    commands::disposals::{
        ApproveDisposalCommand, CreateDisposalCommand, ExecuteDisposalCommand,
        RejectDisposalCommand,
    },
    entities::disposal::{self, DisposalMethod, DisposalStatus},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct DisposalListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<DisposalStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDisposalRequest {
    pub item_id: Uuid,
    pub reason: String,
    pub disposal_method: DisposalMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct ApproveDisposalRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectDisposalRequest {
    pub rejection_reason: String,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct ExecuteDisposalRequest {
    pub proceeds: Option<Decimal>,
    pub notes: Option<String>,
}

pub async fn list_disposals(
    State(state): State<AppState>,
    actor: AuthUser,
    Query(query): Query<DisposalListQuery>,
) -> ApiResult<PaginatedResponse<disposal::Model>> {
    crate::auth::authorize(&actor, crate::auth::consts::DISPOSALS_READ)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (rows, total) = state
        .services
        .disposals
        .list_disposals(page, limit, query.status)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        rows, total, page, limit,
    ))))
}

pub async fn get_disposal(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<disposal::Model> {
    crate::auth::authorize(&actor, crate::auth::consts::DISPOSALS_READ)?;
    let row = state.services.disposals.get_disposal(id).await?;
    Ok(Json(ApiResponse::success(row)))
}

pub async fn create_disposal(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(payload): Json<CreateDisposalRequest>,
) -> ApiResult<disposal::Model> {
    let command = CreateDisposalCommand {
        actor,
        item_id: payload.item_id,
        reason: payload.reason,
        disposal_method: payload.disposal_method,
        notes: payload.notes,
    };
    let created = state.services.disposals.create_disposal(command).await?;
    Ok(Json(ApiResponse::success(created)))
}

pub async fn approve_disposal(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveDisposalRequest>,
) -> ApiResult<disposal::Model> {
    let command = ApproveDisposalCommand {
        actor,
        disposal_id: id,
        notes: payload.notes,
    };
    let updated = state.services.disposals.approve_disposal(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn reject_disposal(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectDisposalRequest>,
) -> ApiResult<disposal::Model> {
    let command = RejectDisposalCommand {
        actor,
        disposal_id: id,
        rejection_reason: payload.rejection_reason,
    };
    let updated = state.services.disposals.reject_disposal(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn execute_disposal(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExecuteDisposalRequest>,
) -> ApiResult<disposal::Model> {
    let command = ExecuteDisposalCommand {
        actor,
        disposal_id: id,
        proceeds: payload.proceeds,
        notes: payload.notes,
    };
    let updated = state.services.disposals.execute_disposal(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}
