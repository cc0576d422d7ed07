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
        disposal::{self, DisposalStatus},
        item::{self, ItemStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Executes an approved disposal: the disposal is finalized and the item
/// is marked disposed. Execution from any other status is refused;
/// approval cannot be skipped.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ExecuteDisposalCommand {
    pub actor: AuthUser,
    pub disposal_id: Uuid,
    #[validate(custom = "validate_proceeds_non_negative")]
    pub proceeds: Option<Decimal>,
    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,
}

fn validate_proceeds_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("Proceeds must be non-negative"));
    }
    Ok(())
}

#[async_trait::async_trait]
impl Command for ExecuteDisposalCommand {
    type Result = disposal::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(disposal_id = %self.disposal_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::DISPOSALS_EXECUTE)?;

        let db = db_pool.as_ref();
        let txn = db.begin().await?;

        let record = disposal::Entity::find_by_id(self.disposal_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Disposal {} not found", self.disposal_id))
            })?;

        if !record.status.can_transition_to(&DisposalStatus::Executed) {
            return Err(ServiceError::invalid_transition(
                "disposal",
                record.id,
                record.status.as_str(),
                "execute",
            ));
        }

        let item_id = record.item_id;
        let disposal_id = record.id;

        let mut active: disposal::ActiveModel = record.into();
        active.status = Set(DisposalStatus::Executed);
        active.executed_by = Set(Some(self.actor.id));
        active.executed_at = Set(Some(Utc::now()));
        if self.proceeds.is_some() {
            active.proceeds = Set(self.proceeds);
        }
        if self.notes.is_some() {
            active.notes = Set(self.notes.clone());
        }
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await?;

        if let Some(target) = item::Entity::find_by_id(item_id).one(&txn).await? {
            let mut item_active: item::ActiveModel = target.into();
            item_active.status = Set(ItemStatus::Disposed);
            item_active.updated_at = Set(Some(Utc::now()));
            item_active.update(&txn).await?;
        }

        txn.commit().await?;

        info!(disposal_id = %disposal_id, item_id = %item_id, "Disposal executed");
        event_sender
            .send(Event::DisposalExecuted {
                disposal_id,
                item_id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
