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
    entities::request::{self, RequestStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Takes a request under review.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct StartReviewCommand {
    pub actor: AuthUser,
    pub request_id: Uuid,
}

#[async_trait::async_trait]
impl Command for StartReviewCommand {
    type Result = request::Model;

    #[instrument(skip(self, db_pool, event_sender), fields(request_id = %self.request_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()?;
        policy::authorize(&self.actor, perm::REQUESTS_REVIEW)?;

        let db = db_pool.as_ref();
        let record = request::Entity::find_by_id(self.request_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Request {} not found", self.request_id))
            })?;

        if !record.status.can_transition_to(&RequestStatus::UnderReview) {
            return Err(ServiceError::invalid_transition(
                "request",
                record.id,
                record.status.as_str(),
                "start review",
            ));
        }

        let mut active: request::ActiveModel = record.into();
        active.status = Set(RequestStatus::UnderReview);
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        info!(request_id = %updated.id, "Request taken under review");
        event_sender
            .send(Event::RequestReviewStarted(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
