use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    commands::disposals::{
        ApproveDisposalCommand, CreateDisposalCommand, ExecuteDisposalCommand,
        RejectDisposalCommand,
    },
    commands::Command,
    db::DbPool,
    entities::disposal::{self, DisposalStatus},
    errors::ServiceError,
    events::EventSender,
};

/// Service for managing disposals.
#[derive(Clone)]
pub struct DisposalService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl DisposalService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn create_disposal(
        &self,
        command: CreateDisposalCommand,
    ) -> Result<disposal::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn approve_disposal(
        &self,
        command: ApproveDisposalCommand,
    ) -> Result<disposal::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn reject_disposal(
        &self,
        command: RejectDisposalCommand,
    ) -> Result<disposal::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn execute_disposal(
        &self,
        command: ExecuteDisposalCommand,
    ) -> Result<disposal::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    pub async fn get_disposal(&self, id: Uuid) -> Result<disposal::Model, ServiceError> {
        disposal::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Disposal {} not found", id)))
    }

    /// The item's live (pending or approved) disposal, if any.
    pub async fn live_disposal_for_item(
        &self,
        item_id: Uuid,
    ) -> Result<Option<disposal::Model>, ServiceError> {
        let found = disposal::Entity::find()
            .filter(disposal::Column::ItemId.eq(item_id))
            .filter(
                disposal::Column::Status
                    .is_in([DisposalStatus::Pending, DisposalStatus::Approved]),
            )
            .order_by_desc(disposal::Column::CreatedAt)
            .one(self.db_pool.as_ref())
            .await?;
        Ok(found)
    }

    pub async fn list_disposals(
        &self,
        page: u64,
        limit: u64,
        status: Option<DisposalStatus>,
    ) -> Result<(Vec<disposal::Model>, u64), ServiceError> {
        let mut query = disposal::Entity::find();
        if let Some(status) = status {
            query = query.filter(disposal::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(disposal::Column::CreatedAt)
            .paginate(self.db_pool.as_ref(), limit);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }
}
