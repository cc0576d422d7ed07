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
    entities::item_return::{self, ReturnStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Rejects an inspected return, keeping the item with its custodian
/// record unsettled for follow-up. Rejection always carries a reason.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RejectReturnCommand {
    pub actor: AuthUser,
    pub return_id: Uuid,
    #[validate(length(min = 1, max = 1000, message = "Rejection notes cannot be empty"))]
    pub notes: String,
}

#[async_trait::async_trait]
impl Command for RejectReturnCommand {
    type Result = item_return::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(return_id = %self.return_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::RETURNS_REJECT)?;

        let db = db_pool.as_ref();
        let record = item_return::Entity::find_by_id(self.return_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Return {} not found", self.return_id))
            })?;

        if !record.status.can_transition_to(&ReturnStatus::Rejected) {
            return Err(ServiceError::invalid_transition(
                "return",
                record.id,
                record.status.as_str(),
                "reject",
            ));
        }

        let mut active: item_return::ActiveModel = record.into();
        active.status = Set(ReturnStatus::Rejected);
        active.reviewed_by = Set(Some(self.actor.id));
        active.reviewed_at = Set(Some(Utc::now()));
        active.notes = Set(Some(self.notes.clone()));
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        info!(return_id = %updated.id, "Return rejected");
        event_sender
            .send(Event::ReturnRejected(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
