use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{consts as perm, policy, AuthUser},
    commands::Command,
    db::DbPool,
    entities::maintenance::{self, MaintenanceStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Puts a pending maintenance record on the calendar. The scheduled date
/// must be strictly in the future at submission time.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ScheduleMaintenanceCommand {
    pub actor: AuthUser,
    pub maintenance_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub assigned_to: Option<Uuid>,
}

#[async_trait::async_trait]
impl Command for ScheduleMaintenanceCommand {
    type Result = maintenance::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(maintenance_id = %self.maintenance_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::MAINTENANCE_SCHEDULE)?;

        if self.scheduled_date <= Utc::now() {
            return Err(ServiceError::ValidationError(
                "scheduled_date must be strictly in the future".to_string(),
            ));
        }

        let db = db_pool.as_ref();
        let record = maintenance::Entity::find_by_id(self.maintenance_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Maintenance {} not found", self.maintenance_id))
            })?;

        if !record.status.can_transition_to(&MaintenanceStatus::Scheduled) {
            return Err(ServiceError::invalid_transition(
                "maintenance",
                record.id,
                record.status.as_str(),
                "schedule",
            ));
        }

        let mut active: maintenance::ActiveModel = record.into();
        active.status = Set(MaintenanceStatus::Scheduled);
        active.scheduled_date = Set(Some(self.scheduled_date));
        active.assigned_to = Set(self.assigned_to);
        active.approved_by = Set(Some(self.actor.id));
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        info!(maintenance_id = %updated.id, "Maintenance scheduled");
        event_sender
            .send(Event::MaintenanceScheduled(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
