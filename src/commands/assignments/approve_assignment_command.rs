use chrono::Utc;
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
    entities::assignment::{self, AssignmentStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Approves a pending assignment.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ApproveAssignmentCommand {
    pub actor: AuthUser,
    pub assignment_id: Uuid,
    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,
}

#[async_trait::async_trait]
impl Command for ApproveAssignmentCommand {
    type Result = assignment::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(assignment_id = %self.assignment_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::ASSIGNMENTS_APPROVE)?;

        let db = db_pool.as_ref();
        let record = assignment::Entity::find_by_id(self.assignment_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Assignment {} not found", self.assignment_id))
            })?;

        if !record.status.can_transition_to(&AssignmentStatus::Approved) {
            return Err(ServiceError::invalid_transition(
                "assignment",
                record.id,
                record.status.as_str(),
                "approve",
            ));
        }

        let mut active: assignment::ActiveModel = record.into();
        active.status = Set(AssignmentStatus::Approved);
        active.approved_by = Set(Some(self.actor.id));
        active.approved_at = Set(Some(Utc::now()));
        if self.notes.is_some() {
            active.notes = Set(self.notes.clone());
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        info!(assignment_id = %updated.id, "Assignment approved");
        event_sender
            .send(Event::AssignmentApproved(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
