use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    commands::maintenance::{
        CancelMaintenanceCommand, CompleteMaintenanceCommand, CreateMaintenanceCommand,
        ScheduleMaintenanceCommand, StartMaintenanceCommand,
    },
    commands::Command,
    db::DbPool,
    entities::maintenance::{self, MaintenanceStatus},
    errors::ServiceError,
    events::EventSender,
};

/// Service for managing maintenance work.
#[derive(Clone)]
pub struct MaintenanceService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl MaintenanceService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn create_maintenance(
        &self,
        command: CreateMaintenanceCommand,
    ) -> Result<maintenance::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn schedule_maintenance(
        &self,
        command: ScheduleMaintenanceCommand,
    ) -> Result<maintenance::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn start_maintenance(
        &self,
        command: StartMaintenanceCommand,
    ) -> Result<maintenance::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn complete_maintenance(
        &self,
        command: CompleteMaintenanceCommand,
    ) -> Result<maintenance::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self, command))]
    pub async fn cancel_maintenance(
        &self,
        command: CancelMaintenanceCommand,
    ) -> Result<maintenance::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    pub async fn get_maintenance(&self, id: Uuid) -> Result<maintenance::Model, ServiceError> {
        maintenance::Entity::find_by_id(id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Maintenance {} not found", id)))
    }

    pub async fn list_maintenance(
        &self,
        page: u64,
        limit: u64,
        status: Option<MaintenanceStatus>,
        item_id: Option<Uuid>,
    ) -> Result<(Vec<maintenance::Model>, u64), ServiceError> {
        let mut query = maintenance::Entity::find();
        if let Some(status) = status {
            query = query.filter(maintenance::Column::Status.eq(status));
        }
        if let Some(item_id) = item_id {
            query = query.filter(maintenance::Column::ItemId.eq(item_id));
        }

        let paginator = query
            .order_by_desc(maintenance::Column::CreatedAt)
            .paginate(self.db_pool.as_ref(), limit);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }
}
