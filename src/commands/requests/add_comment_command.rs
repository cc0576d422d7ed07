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
    entities::{request, request_comment},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Adds a comment to a request. Internal comments are visible only to
/// actors holding the review permission; flagging one requires it too.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AddCommentCommand {
    pub actor: AuthUser,
    pub request_id: Uuid,
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub comment: String,
    pub is_internal: bool,
}

#[async_trait::async_trait]
impl Command for AddCommentCommand {
    type Result = request_comment::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(request_id = %self.request_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::REQUESTS_COMMENT)?;
        if self.is_internal {
            policy::authorize(&self.actor, perm::REQUESTS_REVIEW)?;
        }

        let db = db_pool.as_ref();
        let parent = request::Entity::find_by_id(self.request_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Request {} not found", self.request_id))
            })?;

        let record = request_comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            request_id: Set(parent.id),
            user_id: Set(self.actor.id),
            comment: Set(self.comment.clone()),
            is_internal: Set(self.is_internal),
            created_at: Set(Utc::now()),
        };

        let created = record.insert(db).await?;

        info!(comment_id = %created.id, "Comment added");
        event_sender
            .send(Event::RequestCommentAdded {
                request_id: parent.id,
                comment_id: created.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }
}
