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

/// Cancels a request. Owner-path authorization applies: the owner may
/// cancel without the cancel permission. Cancellation is blocked only
/// once the request is completed or already cancelled.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CancelRequestCommand {
    pub actor: AuthUser,
    pub request_id: Uuid,
}

#[async_trait::async_trait]
impl Command for CancelRequestCommand {
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

        policy::authorize_owner_or(&self.actor, record.user_id, perm::REQUESTS_CANCEL)?;

        if !record.status.allows_cancel() {
            return Err(ServiceError::invalid_transition(
                "request",
                record.id,
                record.status.as_str(),
                "cancel",
            ));
        }

        let mut active: request::ActiveModel = record.into();
        active.status = Set(RequestStatus::Cancelled);
        active.cancelled_at = Set(Some(Utc::now()));
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        info!(request_id = %updated.id, "Request cancelled");
        event_sender
            .send(Event::RequestCancelled(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}
