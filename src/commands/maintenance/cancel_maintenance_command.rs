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
        item,
        maintenance::{self, MaintenanceStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Cancels maintenance from any non-terminal status. If work had already
/// started, the item is restored from its pre-maintenance snapshot.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CancelMaintenanceCommand {
    pub actor: AuthUser,
    pub maintenance_id: Uuid,
}

#[async_trait::async_trait]
impl Command for CancelMaintenanceCommand {
    type Result = maintenance::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(maintenance_id = %self.maintenance_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::MAINTENANCE_CANCEL)?;

        let db = db_pool.as_ref();
        let txn = db.begin().await?;

        let record = maintenance::Entity::find_by_id(self.maintenance_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Maintenance {} not found", self.maintenance_id))
            })?;

        if !record.status.can_transition_to(&MaintenanceStatus::Cancelled) {
            return Err(ServiceError::invalid_transition(
                "maintenance",
                record.id,
                record.status.as_str(),
                "cancel",
            ));
        }

        let was_started = record.status == MaintenanceStatus::InProgress;
        let maintenance_id = record.id;
        let item_id = record.item_id;
        let pre_status = record.pre_status.clone();
        let pre_condition = record.pre_condition.clone();
        let now = Utc::now();

        let mut active: maintenance::ActiveModel = record.into();
        active.status = Set(MaintenanceStatus::Cancelled);
        active.updated_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        if was_started {
            if let Some(target) = item::Entity::find_by_id(item_id).one(&txn).await? {
                let mut item_active: item::ActiveModel = target.into();
                if let Some(status) = pre_status {
                    item_active.status = Set(status);
                }
                if let Some(condition) = pre_condition {
                    item_active.condition = Set(condition);
                }
                item_active.updated_at = Set(Some(now));
                item_active.update(&txn).await?;
            }
        }

        txn.commit().await?;

        info!(maintenance_id = %maintenance_id, "Maintenance cancelled");
        event_sender
            .send(Event::MaintenanceCancelled(maintenance_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
