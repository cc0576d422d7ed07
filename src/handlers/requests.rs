use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{policy, AuthUser},
    commands::requests::{
        AddCommentCommand, ApproveRequestCommand, CancelRequestCommand, CompleteRequestCommand,
        RejectRequestCommand, RequestChangesCommand, StartReviewCommand, SubmitRequestCommand,
        UpdateRequestCommand,
    },
    entities::{
        request::{self, RequestPriority, RequestStatus, RequestType},
        request_comment,
    },
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct RequestListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<RequestStatus>,
    /// Restrict to requests owned by this user
    pub owner: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitRequestRequest {
    pub request_type: RequestType,
    pub item_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub priority: RequestPriority,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct UpdateRequestRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<RequestPriority>,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct ReviewNotesRequest {
    pub review_notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerdictNotesRequest {
    pub review_notes: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCommentRequest {
    pub comment: String,
    #[serde(default)]
    pub is_internal: bool,
}

/// Request plus the viewing actor's available moves. The policy flags are
/// computed per viewer at the presentation boundary, never stored.
#[derive(Debug, Serialize, ToSchema)]
pub struct RequestDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub request_type: RequestType,
    pub item_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub priority: RequestPriority,
    pub status: RequestStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub can_edit: bool,
    pub can_review: bool,
    pub can_cancel: bool,
}

impl RequestDetail {
    fn for_viewer(model: request::Model, viewer: &AuthUser) -> Self {
        let can_edit = policy::can_edit_request(&model, viewer);
        let can_review = policy::can_review_request(&model, viewer);
        let can_cancel = policy::can_cancel_request(&model, viewer);
        Self {
            id: model.id,
            user_id: model.user_id,
            request_type: model.request_type,
            item_id: model.item_id,
            title: model.title,
            description: model.description,
            priority: model.priority,
            status: model.status,
            reviewed_by: model.reviewed_by,
            reviewed_at: model.reviewed_at,
            review_notes: model.review_notes,
            completed_at: model.completed_at,
            cancelled_at: model.cancelled_at,
            created_at: model.created_at,
            can_edit,
            can_review,
            can_cancel,
        }
    }
}

pub async fn list_requests(
    State(state): State<AppState>,
    actor: AuthUser,
    Query(query): Query<RequestListQuery>,
) -> ApiResult<PaginatedResponse<RequestDetail>> {
    crate::auth::authorize(&actor, crate::auth::consts::REQUESTS_READ)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (rows, total) = state
        .services
        .requests
        .list_requests(page, limit, query.status, query.owner)
        .await?;

    let details = rows
        .into_iter()
        .map(|m| RequestDetail::for_viewer(m, &actor))
        .collect();

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        details, total, page, limit,
    ))))
}

pub async fn get_request(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<RequestDetail> {
    crate::auth::authorize(&actor, crate::auth::consts::REQUESTS_READ)?;
    let row = state.services.requests.get_request(id).await?;
    Ok(Json(ApiResponse::success(RequestDetail::for_viewer(
        row, &actor,
    ))))
}

pub async fn submit_request(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(payload): Json<SubmitRequestRequest>,
) -> ApiResult<request::Model> {
    let command = SubmitRequestCommand {
        actor,
        request_type: payload.request_type,
        item_id: payload.item_id,
        title: payload.title,
        description: payload.description,
        priority: payload.priority,
    };
    let created = state.services.requests.submit_request(command).await?;
    Ok(Json(ApiResponse::success(created)))
}

pub async fn update_request(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRequestRequest>,
) -> ApiResult<request::Model> {
    let command = UpdateRequestCommand {
        actor,
        request_id: id,
        title: payload.title,
        description: payload.description,
        priority: payload.priority,
    };
    let updated = state.services.requests.update_request(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn start_review(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<request::Model> {
    let command = StartReviewCommand {
        actor,
        request_id: id,
    };
    let updated = state.services.requests.start_review(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn approve_request(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewNotesRequest>,
) -> ApiResult<request::Model> {
    let command = ApproveRequestCommand {
        actor,
        request_id: id,
        review_notes: payload.review_notes,
    };
    let updated = state.services.requests.approve_request(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn reject_request(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerdictNotesRequest>,
) -> ApiResult<request::Model> {
    let command = RejectRequestCommand {
        actor,
        request_id: id,
        review_notes: payload.review_notes,
    };
    let updated = state.services.requests.reject_request(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn request_changes(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerdictNotesRequest>,
) -> ApiResult<request::Model> {
    let command = RequestChangesCommand {
        actor,
        request_id: id,
        review_notes: payload.review_notes,
    };
    let updated = state.services.requests.request_changes(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn complete_request(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<request::Model> {
    let command = CompleteRequestCommand {
        actor,
        request_id: id,
    };
    let updated = state.services.requests.complete_request(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn cancel_request(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<request::Model> {
    let command = CancelRequestCommand {
        actor,
        request_id: id,
    };
    let updated = state.services.requests.cancel_request(command).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<request_comment::Model>> {
    crate::auth::authorize(&actor, crate::auth::consts::REQUESTS_READ)?;
    let rows = state.services.requests.list_comments(id, &actor).await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub async fn add_comment(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddCommentRequest>,
) -> ApiResult<request_comment::Model> {
    let command = AddCommentCommand {
        actor,
        request_id: id,
        comment: payload.comment,
        is_internal: payload.is_internal,
    };
    let created = state.services.requests.add_comment(command).await?;
    Ok(Json(ApiResponse::success(created)))
}
