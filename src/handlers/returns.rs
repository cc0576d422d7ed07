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
    commands::returns::{ApproveReturnCommand, InspectReturnCommand, RejectReturnCommand},
    entities::{
        item::ItemCondition,
        item_return::{self, ReturnStatus},
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct ReturnListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<ReturnStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InspectReturnRequest {
    pub condition_on_return: ItemCondition,
    #[serde(default)]
    pub is_damaged: bool,
    pub penalty_amount: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct ApproveReturnRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectReturnRequest {
    pub notes: String,
}

pub async fn list_returns(
    State(state): State<AppState>,
    actor: AuthUser,
    Query(query): Query<ReturnListQuery>,
) -> ApiResult<PaginatedResponse<item_return::Model>> {
    crate::auth::authorize(&actor, crate::auth::consts::RETURNS_READ)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (rows, total) = state
        .services
        .returns
        .list_returns(page, limit, query.status)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        rows, total, page, limit,
    ))))
}

pub async fn get_return(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<item_return::Model> {
    crate::auth::authorize(&actor, crate::auth::consts::RETURNS_READ)?;
    let row = state.services.returns.get_return(id).await?;
    Ok(Json(ApiResponse::success(row)))
}

pub async fn inspect_return(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<InspectReturnRequest>,
) -> ApiResult<item_return::Model> {
    let command = InspectReturnCommand {
        actor,
        return_id: id,
        condition_on_return: payload.condition_on_return,
        is_damaged: payload.is_damaged,
        penalty_amount: payload.penalty_amount,
        notes: payload.notes,
    };
    let updated = state.services.returns.inspect_return(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn approve_return(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveReturnRequest>,
) -> ApiResult<item_return::Model> {
    let command = ApproveReturnCommand {
        actor,
        return_id: id,
        notes: payload.notes,
    };
    let updated = state.services.returns.approve_return(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn reject_return(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectReturnRequest>,
) -> ApiResult<item_return::Model> {
    let command = RejectReturnCommand {
        actor,
        return_id: id,
        notes: payload.notes,
    };
    let updated = state.services.returns.reject_return(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}
