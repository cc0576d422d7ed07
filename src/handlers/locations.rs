use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{consts as perm, policy, AuthUser},
    entities::location,
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct LocationListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLocationRequest {
    pub code: String,
    pub name: String,
    pub building: Option<String>,
    pub room: Option<String>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct UpdateLocationRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub building: Option<String>,
    pub room: Option<String>,
}

pub async fn list_locations(
    State(state): State<AppState>,
    actor: AuthUser,
    Query(query): Query<LocationListQuery>,
) -> ApiResult<PaginatedResponse<location::Model>> {
    policy::authorize(&actor, perm::LOCATIONS_READ)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(50).clamp(1, 100);

    let (rows, total) = state.services.locations.list_locations(page, limit).await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        rows, total, page, limit,
    ))))
}

pub async fn get_location(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<location::Model> {
    policy::authorize(&actor, perm::LOCATIONS_READ)?;
    let row = state.services.locations.get_location(id).await?;
    Ok(Json(ApiResponse::success(row)))
}

pub async fn create_location(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(payload): Json<CreateLocationRequest>,
) -> ApiResult<location::Model> {
    policy::authorize(&actor, perm::LOCATIONS_CREATE)?;
    let created = state
        .services
        .locations
        .create_location(payload.code, payload.name, payload.building, payload.room)
        .await?;
    Ok(Json(ApiResponse::success(created)))
}

pub async fn update_location(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> ApiResult<location::Model> {
    policy::authorize(&actor, perm::LOCATIONS_UPDATE)?;
    let updated = state
        .services
        .locations
        .update_location(
            id,
            payload.code,
            payload.name,
            payload.building.map(Some),
            payload.room.map(Some),
        )
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn delete_location(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<location::Model> {
    policy::authorize(&actor, perm::LOCATIONS_DELETE)?;
    let deleted = state.services.locations.delete_location(id).await?;
    Ok(Json(ApiResponse::success(deleted)))
}
