use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Domain events emitted after each successful lifecycle transition.
///
/// Consumers must tolerate new variants appearing over time; the enum is
/// `#[non_exhaustive]` for that reason.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Item events
    ItemCreated(Uuid),
    ItemUpdated(Uuid),
    ItemDeleted(Uuid),
    ItemRestored(Uuid),
    ItemQrGenerated(Uuid),

    // Assignment events
    AssignmentCreated(Uuid),
    AssignmentApproved(Uuid),
    AssignmentActivated(Uuid),
    AssignmentCancelled(Uuid),
    AssignmentReturned {
        assignment_id: Uuid,
        return_id: Uuid,
    },

    // Return inspection events
    ReturnInspected(Uuid),
    ReturnApproved(Uuid),
    ReturnRejected(Uuid),

    // Disposal events
    DisposalRequested(Uuid),
    DisposalApproved(Uuid),
    DisposalRejected(Uuid),
    DisposalExecuted {
        disposal_id: Uuid,
        item_id: Uuid,
    },

    // Maintenance events
    MaintenanceRequested(Uuid),
    MaintenanceScheduled(Uuid),
    MaintenanceStarted(Uuid),
    MaintenanceCompleted(Uuid),
    MaintenanceCancelled(Uuid),

    // Request workflow events
    RequestSubmitted(Uuid),
    RequestUpdated(Uuid),
    RequestReviewStarted(Uuid),
    RequestApproved(Uuid),
    RequestRejected(Uuid),
    RequestChangesRequested(Uuid),
    RequestCompleted(Uuid),
    RequestCancelled(Uuid),
    RequestCommentAdded {
        request_id: Uuid,
        comment_id: Uuid,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes events off the channel for the lifetime of the process.
///
/// Today this only records them; downstream integrations subscribe here.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        debug!(event = ?event, "domain event");
    }
    info!("Event processor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_flow_through_channel() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::DisposalExecuted {
                disposal_id: Uuid::new_v4(),
                item_id: Uuid::new_v4(),
            })
            .await
            .expect("send");

        match rx.recv().await {
            Some(Event::DisposalExecuted { .. }) => {}
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        assert!(sender.send(Event::ItemCreated(Uuid::new_v4())).await.is_err());
    }
}
