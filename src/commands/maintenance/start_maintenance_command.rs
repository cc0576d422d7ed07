use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
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
        maintenance::{self, MaintenanceStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Starts scheduled maintenance work: stamps the start time, snapshots
/// the item's pre-maintenance status and condition, and moves the item
/// under maintenance. Both writes share one transaction.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct StartMaintenanceCommand {
    pub actor: AuthUser,
    pub maintenance_id: Uuid,
}

#[async_trait::async_trait]
impl Command for StartMaintenanceCommand {
    type Result = maintenance::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(maintenance_id = %self.maintenance_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::MAINTENANCE_START)?;

        let db = db_pool.as_ref();
        let txn = db.begin().await?;

        let record = maintenance::Entity::find_by_id(self.maintenance_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Maintenance {} not found", self.maintenance_id))
            })?;

        if !record.status.can_transition_to(&MaintenanceStatus::InProgress) {
            return Err(ServiceError::invalid_transition(
                "maintenance",
                record.id,
                record.status.as_str(),
                "start",
            ));
        }

        let target = item::Entity::find_by_id(record.item_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", record.item_id)))?;

        let maintenance_id = record.id;
        let now = Utc::now();

        let mut active: maintenance::ActiveModel = record.into();
        active.status = Set(MaintenanceStatus::InProgress);
        active.started_at = Set(Some(now));
        active.pre_status = Set(Some(target.status.clone()));
        active.pre_condition = Set(Some(target.condition.clone()));
        active.updated_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        let mut item_active: item::ActiveModel = target.into();
        item_active.status = Set(ItemStatus::UnderMaintenance);
        item_active.updated_at = Set(Some(now));
        item_active.update(&txn).await?;

        txn.commit().await?;

        info!(maintenance_id = %maintenance_id, "Maintenance started");
        event_sender
            .send(Event::MaintenanceStarted(maintenance_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
