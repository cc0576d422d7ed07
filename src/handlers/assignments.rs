use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    commands::assignments::{
        ActivateAssignmentCommand, ApproveAssignmentCommand, CancelAssignmentCommand,
        CreateAssignmentCommand, ReturnAssignmentCommand, ReturnAssignmentResult,
    },
    entities::assignment::{self, AssignmentStatus},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct AssignmentListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<AssignmentStatus>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAssignmentRequest {
    pub item_id: Uuid,
    pub user_id: Uuid,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct TransitionNotes {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct ReturnAssignmentRequest {
    pub return_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

pub async fn list_assignments(
    State(state): State<AppState>,
    actor: AuthUser,
    Query(query): Query<AssignmentListQuery>,
) -> ApiResult<PaginatedResponse<assignment::Model>> {
    crate::auth::authorize(&actor, crate::auth::consts::ASSIGNMENTS_READ)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (rows, total) = state
        .services
        .assignments
        .list_assignments(page, limit, query.status, query.user_id)
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        rows, total, page, limit,
    ))))
}

pub async fn get_assignment(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<assignment::Model> {
    crate::auth::authorize(&actor, crate::auth::consts::ASSIGNMENTS_READ)?;
    let row = state.services.assignments.get_assignment(id).await?;
    Ok(Json(ApiResponse::success(row)))
}

pub async fn create_assignment(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(payload): Json<CreateAssignmentRequest>,
) -> ApiResult<assignment::Model> {
    let command = CreateAssignmentCommand {
        actor,
        item_id: payload.item_id,
        user_id: payload.user_id,
        due_date: payload.due_date,
        notes: payload.notes,
    };
    let created = state.services.assignments.create_assignment(command).await?;
    Ok(Json(ApiResponse::success(created)))
}

pub async fn approve_assignment(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionNotes>,
) -> ApiResult<assignment::Model> {
    let command = ApproveAssignmentCommand {
        actor,
        assignment_id: id,
        notes: payload.notes,
    };
    let updated = state.services.assignments.approve_assignment(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn activate_assignment(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<assignment::Model> {
    let command = ActivateAssignmentCommand {
        actor,
        assignment_id: id,
    };
    let updated = state
        .services
        .assignments
        .activate_assignment(command)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn cancel_assignment(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionNotes>,
) -> ApiResult<assignment::Model> {
    let command = CancelAssignmentCommand {
        actor,
        assignment_id: id,
        notes: payload.notes,
    };
    let updated = state.services.assignments.cancel_assignment(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn return_assignment(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReturnAssignmentRequest>,
) -> ApiResult<ReturnAssignmentResult> {
    let command = ReturnAssignmentCommand {
        actor,
        assignment_id: id,
        return_date: payload.return_date,
        notes: payload.notes,
    };
    let result = state.services.assignments.return_assignment(command).await?;
    Ok(Json(ApiResponse::success(result)))
}
