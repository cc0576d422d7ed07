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
    entities::disposal::{self, DisposalStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Rejects a pending disposal. Rejection always carries a reason.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RejectDisposalCommand {
    pub actor: AuthUser,
    pub disposal_id: Uuid,
    #[validate(length(min = 1, max = 1000, message = "Rejection reason cannot be empty"))]
    pub rejection_reason: String,
}

#[async_trait::async_trait]
impl Command for RejectDisposalCommand {
    type Result = disposal::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(disposal_id = %self.disposal_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::DISPOSALS_REJECT)?;

        let db = db_pool.as_ref();
        let record = disposal::Entity::find_by_id(self.disposal_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Disposal {} not found", self.disposal_id))
            })?;

        if !record.status.can_transition_to(&DisposalStatus::Rejected) {
            return Err(ServiceError::invalid_transition(
                "disposal",
                record.id,
                record.status.as_str(),
                "reject",
            ));
        }

        let mut active: disposal::ActiveModel = record.into();
        active.status = Set(DisposalStatus::Rejected);
        active.rejected_by = Set(Some(self.actor.id));
        active.rejected_at = Set(Some(Utc::now()));
        active.rejection_reason = Set(Some(self.rejection_reason.clone()));
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        info!(disposal_id = %updated.id, "Disposal rejected");
        event_sender
            .send(Event::DisposalRejected(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
