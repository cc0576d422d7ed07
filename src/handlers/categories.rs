use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{consts as perm, policy, AuthUser},
    entities::category,
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct CategoryListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct UpdateCategoryRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn list_categories(
    State(state): State<AppState>,
    actor: AuthUser,
    Query(query): Query<CategoryListQuery>,
) -> ApiResult<PaginatedResponse<category::Model>> {
    policy::authorize(&actor, perm::CATEGORIES_READ)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(50).clamp(1, 100);

    let (rows, total) = state
        .services
        .categories
        .list_categories(page, limit)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        rows, total, page, limit,
    ))))
}

pub async fn get_category(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<category::Model> {
    policy::authorize(&actor, perm::CATEGORIES_READ)?;
    let row = state.services.categories.get_category(id).await?;
    Ok(Json(ApiResponse::success(row)))
}

pub async fn create_category(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> ApiResult<category::Model> {
    policy::authorize(&actor, perm::CATEGORIES_CREATE)?;
    let created = state
        .services
        .categories
        .create_category(payload.code, payload.name, payload.description)
        .await?;
    Ok(Json(ApiResponse::success(created)))
}

pub async fn update_category(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> ApiResult<category::Model> {
    policy::authorize(&actor, perm::CATEGORIES_UPDATE)?;
    let updated = state
        .services
        .categories
        .update_category(id, payload.code, payload.name, payload.description.map(Some))
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<category::Model> {
    policy::authorize(&actor, perm::CATEGORIES_DELETE)?;
    let deleted = state.services.categories.delete_category(id).await?;
    Ok(Json(ApiResponse::success(deleted)))
}

pub async fn restore_category(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<category::Model> {
    policy::authorize(&actor, perm::CATEGORIES_UPDATE)?;
    let restored = state.services.categories.restore_category(id).await?;
    Ok(Json(ApiResponse::success(restored)))
}
