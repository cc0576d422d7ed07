use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
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
        item,
        request::{self, RequestPriority, RequestStatus, RequestType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Submits a new workflow request owned by the acting user.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitRequestCommand {
    pub actor: AuthUser,
    pub request_type: RequestType,
    pub item_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,
    pub priority: RequestPriority,
}

#[async_trait::async_trait]
impl Command for SubmitRequestCommand {
    type Result = request::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(actor = %self.actor.id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::REQUESTS_CREATE)?;

        let db = db_pool.as_ref();

        if let Some(item_id) = self.item_id {
            item::Entity::find_by_id(item_id)
                .filter(item::Column::DeletedAt.is_null())
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", item_id)))?;
        }

        let now = Utc::now();
        let record = request::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(self.actor.id),
            request_type: Set(self.request_type.clone()),
            item_id: Set(self.item_id),
            title: Set(self.title.clone()),
            description: Set(self.description.clone()),
            priority: Set(self.priority.clone()),
            status: Set(RequestStatus::Pending),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            review_notes: Set(None),
            completed_at: Set(None),
            cancelled_at: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = record.insert(db).await?;

        info!(request_id = %created.id, "Request submitted");
        event_sender
            .send(Event::RequestSubmitted(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }
}
