use crate::{db::DbPool, errors::ServiceError, events::EventSender};
use async_trait::async_trait;
use std::sync::Arc;

/// Command trait for implementing the Command Pattern.
///
/// Every lifecycle transition is one command object. `execute` checks,
/// in order: the payload field contract, the actor's permission (or the
/// owner path where one exists), the target's existence, and the
/// source-state precondition; only then does it write. The write and any
/// related item side effect share one transaction.
#[async_trait]
pub trait Command: Send + Sync {
    /// The return type of the command when executed successfully
    type Result;

    /// Execute the command with the given dependencies
    ///
    /// # Arguments
    /// * `db_pool` - Database connection pool for persistence operations
    /// * `event_sender` - Channel to publish domain events
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError>;
}

pub mod assignments;
pub mod disposals;
pub mod maintenance;
pub mod requests;
pub mod returns;
