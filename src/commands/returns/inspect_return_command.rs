use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
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
        assignment,
        item::ItemCondition,
        item_return::{self, ReturnStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Records the inspection verdict on a returned item: observed condition,
/// damage flag and any penalty. Lateness is recomputed against the parent
/// assignment's due date; a late flag that is already set stays set.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct InspectReturnCommand {
    pub actor: AuthUser,
    pub return_id: Uuid,
    pub condition_on_return: ItemCondition,
    pub is_damaged: bool,
    #[validate(custom = "validate_penalty_non_negative")]
    pub penalty_amount: Option<Decimal>,
    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,
}

fn validate_penalty_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("Penalty must be non-negative"));
    }
    Ok(())
}

#[async_trait::async_trait]
impl Command for InspectReturnCommand {
    type Result = item_return::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(return_id = %self.return_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::RETURNS_INSPECT)?;

        let db = db_pool.as_ref();
        let record = item_return::Entity::find_by_id(self.return_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Return {} not found", self.return_id))
            })?;

        if !record.status.can_transition_to(&ReturnStatus::Inspected) {
            return Err(ServiceError::invalid_transition(
                "return",
                record.id,
                record.status.as_str(),
                "inspect",
            ));
        }

        let parent = assignment::Entity::find_by_id(record.assignment_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Assignment {} not found", record.assignment_id))
            })?;

        let mut inspected = record;
        inspected.compute_lateness(parent.due_date);

        let mut active: item_return::ActiveModel = inspected.clone().into();
        active.status = Set(ReturnStatus::Inspected);
        active.condition_on_return = Set(Some(self.condition_on_return.clone()));
        active.is_damaged = Set(self.is_damaged);
        active.is_late = Set(inspected.is_late);
        active.days_late = Set(inspected.days_late);
        if let Some(penalty) = self.penalty_amount {
            active.penalty_amount = Set(penalty);
        }
        active.inspected_by = Set(Some(self.actor.id));
        active.inspected_at = Set(Some(Utc::now()));
        if self.notes.is_some() {
            active.notes = Set(self.notes.clone());
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        info!(return_id = %updated.id, is_damaged = updated.is_damaged, "Return inspected");
        event_sender
            .send(Event::ReturnInspected(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
