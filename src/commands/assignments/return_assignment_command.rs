use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
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
        item_return::{self, ReturnStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Records the physical return of an assigned item: the assignment
/// becomes `returned` and an inspection record is opened in
/// `pending_inspection`. Lateness is computed against the assignment's
/// due date at this point.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReturnAssignmentCommand {
    pub actor: AuthUser,
    pub assignment_id: Uuid,
    pub return_date: Option<DateTime<Utc>>,
    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReturnAssignmentResult {
    pub assignment: assignment::Model,
    pub item_return: item_return::Model,
}

#[async_trait::async_trait]
impl Command for ReturnAssignmentCommand {
    type Result = ReturnAssignmentResult;

    #[instrument(skip(self, db_pool, event_sender), fields(assignment_id = %self.assignment_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::ASSIGNMENTS_RETURN)?;

        let db = db_pool.as_ref();
        let txn = db.begin().await?;

        let record = assignment::Entity::find_by_id(self.assignment_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Assignment {} not found", self.assignment_id))
            })?;

        if !record.status.can_transition_to(&AssignmentStatus::Returned) {
            return Err(ServiceError::invalid_transition(
                "assignment",
                record.id,
                record.status.as_str(),
                "return",
            ));
        }

        let now = Utc::now();
        let return_date = self.return_date.unwrap_or(now);
        let due_date = record.due_date;
        let assignment_id = record.id;

        let mut active: assignment::ActiveModel = record.into();
        active.status = Set(AssignmentStatus::Returned);
        active.returned_date = Set(Some(return_date));
        active.updated_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        let mut opened = item_return::Model {
            id: Uuid::new_v4(),
            assignment_id,
            status: ReturnStatus::PendingInspection,
            return_date,
            condition_on_return: None,
            is_damaged: false,
            is_late: false,
            days_late: 0,
            penalty_amount: Decimal::ZERO,
            inspected_by: None,
            inspected_at: None,
            reviewed_by: None,
            reviewed_at: None,
            notes: self.notes.clone(),
            created_at: now,
            updated_at: None,
        };
        opened.compute_lateness(due_date);

        let inserted = item_return::ActiveModel::from(opened.clone())
            .insert(&txn)
            .await?;

        txn.commit().await?;

        info!(
            assignment_id = %assignment_id,
            return_id = %inserted.id,
            is_late = inserted.is_late,
            "Item returned, inspection opened"
        );
        event_sender
            .send(Event::AssignmentReturned {
                assignment_id,
                return_id: inserted.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(ReturnAssignmentResult {
            assignment: updated,
            item_return: inserted,
        })
    }
}
