//! Notification delivery sinks.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::event::RolloutCompletion;

/// A completion event addressed to one user.
#[derive(Debug, Clone)]
pub struct AddressedCompletion {
    /// The requesting user (email).
    pub user: String,
    pub event: RolloutCompletion,
}

/// Delivers rollout completion events to the requesting user.
///
/// Delivery is best-effort: implementations log failures instead of
/// returning them.
#[async_trait]
pub trait NotifySink: Send + Sync {
    async fn notify(&self, user: &str, event: RolloutCompletion);
}

/// In-process fan-out over a tokio broadcast channel.
///
/// Subscribers (websocket bridges, test harnesses) receive every completion
/// event; if none are subscribed the event is dropped after logging.
pub struct BroadcastSink {
    tx: broadcast::Sender<AddressedCompletion>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to completion events.
    pub fn subscribe(&self) -> broadcast::Receiver<AddressedCompletion> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl NotifySink for BroadcastSink {
    async fn notify(&self, user: &str, event: RolloutCompletion) {
        let delivered = self.tx.send(AddressedCompletion {
            user: user.to_string(),
            event,
        });
        match delivered {
            Ok(receivers) => debug!(%user, receivers, "completion event broadcast"),
            Err(_) => debug!(%user, "completion event dropped, no subscribers"),
        }
    }
}

/// Log-only sink for headless runs.
pub struct LogSink;

#[async_trait]
impl NotifySink for LogSink {
    async fn notify(&self, user: &str, event: RolloutCompletion) {
        info!(
            %user,
            job_id = %event.job_id,
            success = event.success.len(),
            warning = event.warning.len(),
            error = event.error.len(),
            details = %event.details,
            "rollout completed"
        );
    }
}
