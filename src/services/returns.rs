use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    commands::returns::{ApproveReturnCommand, InspectReturnCommand, RejectReturnCommand},
    commands::Command,
    db::DbPool,
    entities::item_return::{self, ReturnStatus},
    errors::ServiceError,
    events::EventSender,
};

/// Service for managing return inspections.
#[derive(Clone)]
pub struct ReturnService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ReturnService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn inspect_return(
        &self,
        command: InspectReturnCommand,
    ) -> Result<item_return::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn approve_return(
        &self,
        command: ApproveReturnCommand,
    ) -> Result<item_return::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn reject_return(
        &self,
        command: RejectReturnCommand,
    ) -> Result<item_return::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    pub async fn get_return(&self, id: Uuid) -> Result<item_return::Model, ServiceError> {
        item_return::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Return {} not found", id)))
    }

    pub async fn list_returns(
        &self,
        page: u64,
        limit: u64,
        status: Option<ReturnStatus>,
    ) -> Result<(Vec<item_return::Model>, u64), ServiceError> {
        let mut query = item_return::Entity::find();
        if let Some(status) = status {
            query = query.filter(item_return::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(item_return::Column::CreatedAt)
            .paginate(self.db_pool.as_ref(), limit);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }
}
