use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    auth::{consts as perm, policy, AuthUser},
    commands::Command,
    db::DbPool,
    entities::{
        item::{self, ItemCondition, ItemStatus},
        maintenance::{self, MaintenanceStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Completes in-progress maintenance: the duration is computed from the
/// start stamp, and the item takes the caller-supplied post status and
/// condition, defaulting to the pre-maintenance snapshot. Both writes
/// share one transaction.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CompleteMaintenanceCommand {
    pub actor: AuthUser,
    pub maintenance_id: Uuid,
    pub item_status: Option<ItemStatus>,
    pub item_condition: Option<ItemCondition>,
    #[validate(custom = "validate_cost_non_negative")]
    pub cost: Option<Decimal>,
}

fn validate_cost_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("Cost must be non-negative"));
    }
    Ok(())
}

#[async_trait::async_trait]
impl Command for CompleteMaintenanceCommand {
    type Result = maintenance::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(maintenance_id = %self.maintenance_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::MAINTENANCE_COMPLETE)?;

        let db = db_pool.as_ref();
        let txn = db.begin().await?;

        let record = maintenance::Entity::find_by_id(self.maintenance_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Maintenance {} not found", self.maintenance_id))
            })?;

        if !record.status.can_transition_to(&MaintenanceStatus::Completed) {
            return Err(ServiceError::invalid_transition(
                "maintenance",
                record.id,
                record.status.as_str(),
                "complete",
            ));
        }

        let now = Utc::now();
        let duration_hours = record
            .started_at
            .map(|started| (now - started).num_hours().max(0) as i32);

        let maintenance_id = record.id;
        let item_id = record.item_id;
        let post_status = self
            .item_status
            .clone()
            .or(record.pre_status.clone())
            .unwrap_or(ItemStatus::Available);
        let post_condition = self.item_condition.clone().or(record.pre_condition.clone());

        let mut active: maintenance::ActiveModel = record.into();
        active.status = Set(MaintenanceStatus::Completed);
        active.completed_at = Set(Some(now));
        active.actual_duration_hours = Set(duration_hours);
        if self.cost.is_some() {
            active.cost = Set(self.cost);
        }
        active.updated_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        if let Some(target) = item::Entity::find_by_id(item_id).one(&txn).await? {
            let mut item_active: item::ActiveModel = target.into();
            item_active.status = Set(post_status);
            if let Some(cond) = post_condition {
                item_active.condition = Set(cond);
            }
            item_active.updated_at = Set(Some(now));
            item_active.update(&txn).await?;
        }

        txn.commit().await?;

        info!(maintenance_id = %maintenance_id, "Maintenance completed");
        event_sender
            .send(Event::MaintenanceCompleted(maintenance_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
