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
        assignment::{self, AssignmentStatus},
        item::{self, ItemStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Hands the item over: approved assignment becomes active and the item
/// is marked assigned. Both writes share one transaction, and the item
/// must still be available when it happens.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ActivateAssignmentCommand {
    pub actor: AuthUser,
    pub assignment_id: Uuid,
}

#[async_trait::async_trait]
impl Command for ActivateAssignmentCommand {
    type Result = assignment::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(assignment_id = %self.assignment_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::ASSIGNMENTS_ACTIVATE)?;

        let db = db_pool.as_ref();
        let txn = db.begin().await?;

        let record = assignment::Entity::find_by_id(self.assignment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Assignment {} not found", self.assignment_id))
            })?;

        if !record.status.can_transition_to(&AssignmentStatus::Active) {
            return Err(ServiceError::invalid_transition(
                "assignment",
                record.id,
                record.status.as_str(),
                "activate",
            ));
        }

        let target = item::Entity::find_by_id(record.item_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", record.item_id)))?;

        if target.status != ItemStatus::Available {
            return Err(ServiceError::Conflict(format!(
                "Item {} is {} and cannot be handed over",
                target.id,
                target.status.as_str()
            )));
        }

        let assignment_id = record.id;
        let mut active: assignment::ActiveModel = record.into();
        active.status = Set(AssignmentStatus::Active);
        active.activated_at = Set(Some(Utc::now()));
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await?;

        let mut item_active: item::ActiveModel = target.into();
        item_active.status = Set(ItemStatus::Assigned);
        item_active.updated_at = Set(Some(Utc::now()));
        item_active.update(&txn).await?;

        txn.commit().await?;

        info!(assignment_id = %assignment_id, "Assignment activated, item handed over");
        event_sender
            .send(Event::AssignmentActivated(assignment_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
