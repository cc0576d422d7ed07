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
    entities::request::{self, RequestPriority, RequestStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Edits a request. Owner-path authorization applies: the owner may edit
/// without the update permission, but only while the status allows it.
/// Editing a changes_requested request returns it to pending.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateRequestCommand {
    pub actor: AuthUser,
    pub request_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: Option<String>,
    pub priority: Option<RequestPriority>,
}

#[async_trait::async_trait]
impl Command for UpdateRequestCommand {
    type Result = request::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(request_id = %self.request_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;

        let db = db_pool.as_ref();
        let record = request::Entity::find_by_id(self.request_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Request {} not found", self.request_id))
            })?;

        // Ownership is checked before status so that an outsider learns
        // nothing about the request's state.
        policy::authorize_owner_or(&self.actor, record.user_id, perm::REQUESTS_UPDATE)?;

        if !record.status.allows_edit() {
            return Err(ServiceError::invalid_transition(
                "request",
                record.id,
                record.status.as_str(),
                "edit",
            ));
        }

        let reopened = record.status == RequestStatus::ChangesRequested;

        let mut active: request::ActiveModel = record.into();
        if let Some(title) = &self.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &self.description {
            active.description = Set(description.clone());
        }
        if let Some(priority) = &self.priority {
            active.priority = Set(priority.clone());
        }
        if reopened {
            active.status = Set(RequestStatus::Pending);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        info!(request_id = %updated.id, "Request updated");
        event_sender
            .send(Event::RequestUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
