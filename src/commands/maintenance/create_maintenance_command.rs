use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{consts as perm, policy, AuthUser},
    commands::Command,
    db::DbPool,
    entities::{
        item::{self, ItemStatus},
        maintenance::{self, MaintenancePriority, MaintenanceStatus, MaintenanceType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Opens a pending maintenance record for an item.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateMaintenanceCommand {
    pub actor: AuthUser,
    pub item_id: Uuid,
    pub maintenance_type: MaintenanceType,
    pub priority: MaintenancePriority,
    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters"))]
    pub description: String,
}

#[async_trait::async_trait]
impl Command for CreateMaintenanceCommand {
    type Result = maintenance::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(item_id = %self.item_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::MAINTENANCE_CREATE)?;

        let db = db_pool.as_ref();
        let target = item::Entity::find_by_id(self.item_id)
            .filter(item::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", self.item_id)))?;

        if target.status == ItemStatus::Disposed {
            return Err(ServiceError::invalid_transition(
                "item",
                target.id,
                target.status.as_str(),
                "maintain",
            ));
        }

        let now = Utc::now();
        let record = maintenance::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_id: Set(self.item_id),
            status: Set(MaintenanceStatus::Pending),
            maintenance_type: Set(self.maintenance_type.clone()),
            priority: Set(self.priority.clone()),
            description: Set(self.description.clone()),
            scheduled_date: Set(None),
            started_at: Set(None),
            completed_at: Set(None),
            actual_duration_hours: Set(None),
            cost: Set(None),
            pre_status: Set(None),
            pre_condition: Set(None),
            requested_by: Set(self.actor.id),
            assigned_to: Set(None),
            approved_by: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = record.insert(db).await?;

        info!(maintenance_id = %created.id, "Maintenance requested");
        event_sender
            .send(Event::MaintenanceRequested(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }
}
