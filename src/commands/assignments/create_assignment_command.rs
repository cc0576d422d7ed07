use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{consts as perm, policy, AuthUser},
    commands::Command,
    db::DbPool,
    entities::{
        assignment::{self, AssignmentStatus},
        item,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Creates a pending assignment of an item to a custodian.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateAssignmentCommand {
    pub actor: AuthUser,
    pub item_id: Uuid,
    pub user_id: Uuid,
    pub due_date: Option<DateTime<Utc>>,
    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,
}

#[async_trait::async_trait]
impl Command for CreateAssignmentCommand {
    type Result = assignment::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(item_id = %self.item_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::ASSIGNMENTS_CREATE)?;

        let now = Utc::now();
        if let Some(due) = self.due_date {
            if due <= now {
                return Err(ServiceError::ValidationError(
                    "due_date must be strictly in the future".to_string(),
                ));
            }
        }

        let db = db_pool.as_ref();
        let txn = db.begin().await?;

        let target = item::Entity::find_by_id(self.item_id)
            .filter(item::Column::DeletedAt.is_null())
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", self.item_id)))?;

        if target.status != item::ItemStatus::Available {
            return Err(ServiceError::invalid_transition(
                "item",
                target.id,
                target.status.as_str(),
                "assign",
            ));
        }

        // One live assignment per item, enforced inside the transaction.
        let live = assignment::Entity::find()
            .filter(assignment::Column::ItemId.eq(self.item_id))
            .filter(assignment::Column::Status.is_in([
                AssignmentStatus::Pending,
                AssignmentStatus::Approved,
                AssignmentStatus::Active,
            ]))
            .one(&txn)
            .await?;
        if let Some(existing) = live {
            return Err(ServiceError::Conflict(format!(
                "Item {} already has a live assignment {}",
                self.item_id, existing.id
            )));
        }

        let record = assignment::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_id: Set(self.item_id),
            user_id: Set(self.user_id),
            assigned_by: Set(self.actor.id),
            status: Set(AssignmentStatus::Pending),
            assigned_date: Set(now),
            due_date: Set(self.due_date),
            approved_by: Set(None),
            approved_at: Set(None),
            activated_at: Set(None),
            returned_date: Set(None),
            cancelled_at: Set(None),
            notes: Set(self.notes.clone()),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = record.insert(&txn).await.map_err(|e| {
            error!(item_id = %self.item_id, error = %e, "Failed to create assignment");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await?;

        info!(assignment_id = %created.id, "Assignment created");
        event_sender
            .send(Event::AssignmentCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }
}
