use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    commands::assignments::{
        ActivateAssignmentCommand, ApproveAssignmentCommand, CancelAssignmentCommand,
        CreateAssignmentCommand, ReturnAssignmentCommand, ReturnAssignmentResult,
    },
    commands::Command,
    db::DbPool,
    entities::assignment::{self, AssignmentStatus},
    errors::ServiceError,
    events::EventSender,
};

/// Service for managing item assignments.
#[derive(Clone)]
pub struct AssignmentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl AssignmentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn create_assignment(
        &self,
        command: CreateAssignmentCommand,
    ) -> Result<assignment::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn approve_assignment(
        &self,
        command: ApproveAssignmentCommand,
    ) -> Result<assignment::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn activate_assignment(
        &self,
        command: ActivateAssignmentCommand,
    ) -> Result<assignment::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn cancel_assignment(
        &self,
        command: CancelAssignmentCommand,
    ) -> Result<assignment::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn return_assignment(
        &self,
        command: ReturnAssignmentCommand,
    ) -> Result<ReturnAssignmentResult, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    pub async fn get_assignment(&self, id: Uuid) -> Result<assignment::Model, ServiceError> {
        assignment::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Assignment {} not found", id)))
    }

    /// The item's live assignment, if any.
    pub async fn live_assignment_for_item(
        &self,
        item_id: Uuid,
    ) -> Result<Option<assignment::Model>, ServiceError> {
        let found = assignment::Entity::find()
            .filter(assignment::Column::ItemId.eq(item_id))
            .filter(assignment::Column::Status.is_in([
                AssignmentStatus::Pending,
                AssignmentStatus::Approved,
                AssignmentStatus::Active,
            ]))
            .order_by_desc(assignment::Column::CreatedAt)
            .one(self.db_pool.as_ref())
            .await?;
        Ok(found)
    }

    pub async fn list_assignments(
        &self,
        page: u64,
        limit: u64,
        status: Option<AssignmentStatus>,
        user_id: Option<Uuid>,
    ) -> Result<(Vec<assignment::Model>, u64), ServiceError> {
        let mut query = assignment::Entity::find();
        if let Some(status) = status {
            query = query.filter(assignment::Column::Status.eq(status));
        }
        if let Some(user_id) = user_id {
            query = query.filter(assignment::Column::UserId.eq(user_id));
        }

        let paginator = query
            .order_by_desc(assignment::Column::CreatedAt)
            .paginate(self.db_pool.as_ref(), limit);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }
}
