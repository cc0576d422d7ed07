use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
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
        disposal::{self, DisposalMethod, DisposalStatus},
        item::{self, ItemStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Opens a pending disposal for an item.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateDisposalCommand {
    pub actor: AuthUser,
    pub item_id: Uuid,
    #[validate(length(min = 1, max = 1000, message = "Reason must be 1-1000 characters"))]
    pub reason: String,
    pub disposal_method: DisposalMethod,
    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,
}

#[async_trait::async_trait]
impl Command for CreateDisposalCommand {
    type Result = disposal::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(item_id = %self.item_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::DISPOSALS_CREATE)?;

        let db = db_pool.as_ref();
        let txn = db.begin().await?;

        let target = item::Entity::find_by_id(self.item_id)
            .filter(item::Column::DeletedAt.is_null())
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", self.item_id)))?;

        if target.status == ItemStatus::Disposed {
            return Err(ServiceError::invalid_transition(
                "item",
                target.id,
                target.status.as_str(),
                "dispose",
            ));
        }

        // One live disposal per item, enforced inside the transaction.
        let live = disposal::Entity::find()
            .filter(disposal::Column::ItemId.eq(self.item_id))
            .filter(disposal::Column::Status.is_in([
                DisposalStatus::Pending,
                DisposalStatus::Approved,
            ]))
            .one(&txn)
            .await?;
        if let Some(existing) = live {
            return Err(ServiceError::Conflict(format!(
                "Item {} already has a live disposal {}",
                self.item_id, existing.id
            )));
        }

        let now = Utc::now();
        let record = disposal::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_id: Set(self.item_id),
            status: Set(DisposalStatus::Pending),
            reason: Set(self.reason.clone()),
            disposal_method: Set(self.disposal_method.clone()),
            proceeds: Set(None),
            requested_by: Set(self.actor.id),
            requested_at: Set(now),
            approved_by: Set(None),
            approved_at: Set(None),
            rejected_by: Set(None),
            rejected_at: Set(None),
            rejection_reason: Set(None),
            executed_by: Set(None),
            executed_at: Set(None),
            notes: Set(self.notes.clone()),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = record.insert(&txn).await?;
        txn.commit().await?;

        info!(disposal_id = %created.id, "Disposal requested");
        event_sender
            .send(Event::DisposalRequested(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }
}
