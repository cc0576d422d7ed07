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
        assignment, item,
        item::ItemStatus,
        item_return::{self, ReturnStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Accepts an inspected return: the inspection record is settled, the
/// item takes the inspected condition and becomes available again. Both
/// writes share one transaction.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ApproveReturnCommand {
    pub actor: AuthUser,
    pub return_id: Uuid,
    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,
}

#[async_trait::async_trait]
impl Command for ApproveReturnCommand {
    type Result = item_return::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(return_id = %self.return_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::RETURNS_APPROVE)?;

        let db = db_pool.as_ref();
        let txn = db.begin().await?;

        let record = item_return::Entity::find_by_id(self.return_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Return {} not found", self.return_id))
            })?;

        if !record.status.can_transition_to(&ReturnStatus::Approved) {
            return Err(ServiceError::invalid_transition(
                "return",
                record.id,
                record.status.as_str(),
                "approve",
            ));
        }

        let parent = assignment::Entity::find_by_id(record.assignment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Assignment {} not found", record.assignment_id))
            })?;

        let condition = record.condition_on_return.clone();
        let return_id = record.id;

        let mut active: item_return::ActiveModel = record.into();
        active.status = Set(ReturnStatus::Approved);
        active.reviewed_by = Set(Some(self.actor.id));
        active.reviewed_at = Set(Some(Utc::now()));
        if self.notes.is_some() {
            active.notes = Set(self.notes.clone());
        }
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await?;

        if let Some(target) = item::Entity::find_by_id(parent.item_id).one(&txn).await? {
            let mut item_active: item::ActiveModel = target.into();
            item_active.status = Set(ItemStatus::Available);
            if let Some(cond) = condition {
                item_active.condition = Set(cond);
            }
            item_active.updated_at = Set(Some(Utc::now()));
            item_active.update(&txn).await?;
        }

        txn.commit().await?;

        info!(return_id = %return_id, "Return approved, item released");
        event_sender
            .send(Event::ReturnApproved(return_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
