use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{policy, AuthUser},
    commands::requests::{
        AddCommentCommand, ApproveRequestCommand, CancelRequestCommand, CompleteRequestCommand,
        RejectRequestCommand, RequestChangesCommand, StartReviewCommand, SubmitRequestCommand,
        UpdateRequestCommand,
    },
    commands::Command,
    db::DbPool,
    entities::{
        request::{self, RequestStatus},
        request_comment,
    },
    errors::ServiceError,
    events::EventSender,
};

/// Service for the generic request workflow.
#[derive(Clone)]
pub struct RequestService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl RequestService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn submit_request(
        &self,
        command: SubmitRequestCommand,
    ) -> Result<request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn update_request(
        &self,
        command: UpdateRequestCommand,
    ) -> Result<request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn start_review(
        &self,
        command: StartReviewCommand,
    ) -> Result<request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn approve_request(
        &self,
        command: ApproveRequestCommand,
    ) -> Result<request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn reject_request(
        &self,
        command: RejectRequestCommand,
    ) -> Result<request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn request_changes(
        &self,
        command: RequestChangesCommand,
    ) -> Result<request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn complete_request(
        &self,
        command: CompleteRequestCommand,
    ) -> Result<request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn cancel_request(
        &self,
        command: CancelRequestCommand,
    ) -> Result<request::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn add_comment(
        &self,
        command: AddCommentCommand,
    ) -> Result<request_comment::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    pub async fn get_request(&self, id: Uuid) -> Result<request::Model, ServiceError> {
        request::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Request {} not found", id)))
    }

    pub async fn list_requests(
        &self,
        page: u64,
        limit: u64,
        status: Option<RequestStatus>,
        owner: Option<Uuid>,
    ) -> Result<(Vec<request::Model>, u64), ServiceError> {
        let mut query = request::Entity::find();
        if let Some(status) = status {
            query = query.filter(request::Column::Status.eq(status));
        }
        if let Some(owner) = owner {
            query = query.filter(request::Column::UserId.eq(owner));
        }

        let paginator = query
            .order_by_desc(request::Column::CreatedAt)
            .paginate(self.db_pool.as_ref(), limit);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    /// Comments on a request, with internal comments filtered out unless
    /// the viewer holds the review permission.
    pub async fn list_comments(
        &self,
        request_id: Uuid,
        viewer: &AuthUser,
    ) -> Result<Vec<request_comment::Model>, ServiceError> {
        let mut query =
            request_comment::Entity::find().filter(request_comment::Column::RequestId.eq(request_id));
        if !policy::can_read_internal_comments(viewer) {
            query = query.filter(request_comment::Column::IsInternal.eq(false));
        }

        let rows = query
            .order_by_asc(request_comment::Column::CreatedAt)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(rows)
    }
}
