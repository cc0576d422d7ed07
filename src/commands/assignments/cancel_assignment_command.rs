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

/// Cancels a non-terminal assignment. Cancelling an active assignment
/// frees the item again.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CancelAssignmentCommand {
    pub actor: AuthUser,
    pub assignment_id: Uuid,
    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,
}

#[async_trait::async_trait]
impl Command for CancelAssignmentCommand {
    type Result = assignment::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(assignment_id = %self.assignment_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::ASSIGNMENTS_CANCEL)?;

        let db = db_pool.as_ref();
        let txn = db.begin().await?;

        let record = assignment::Entity::find_by_id(self.assignment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Assignment {} not found", self.assignment_id))
            })?;

        if !record.status.can_transition_to(&AssignmentStatus::Cancelled) {
            return Err(ServiceError::invalid_transition(
                "assignment",
                record.id,
                record.status.as_str(),
                "cancel",
            ));
        }

        let was_active = record.status == AssignmentStatus::Active;
        let item_id = record.item_id;
        let assignment_id = record.id;

        let mut active: assignment::ActiveModel = record.into();
        active.status = Set(AssignmentStatus::Cancelled);
        active.cancelled_at = Set(Some(Utc::now()));
        if self.notes.is_some() {
            active.notes = Set(self.notes.clone());
        }
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await?;

        if was_active {
            if let Some(target) = item::Entity::find_by_id(item_id).one(&txn).await? {
                let mut item_active: item::ActiveModel = target.into();
                item_active.status = Set(ItemStatus::Available);
                item_active.updated_at = Set(Some(Utc::now()));
                item_active.update(&txn).await?;
            }
        }

        txn.commit().await?;

        info!(assignment_id = %assignment_id, "Assignment cancelled");
        event_sender
            .send(Event::AssignmentCancelled(assignment_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
