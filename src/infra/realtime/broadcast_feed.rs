use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::models::change::{ChangeEvent, ChangeFilter, ChangeSubscription};
use crate::domain::ports::ChangeFeed;

/// In-process change feed. Subscribers that fall more than `capacity` events behind skip ahead.
pub struct BroadcastChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl BroadcastChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }
}

impl ChangeFeed for BroadcastChangeFeed {
    fn publish(&self, event: ChangeEvent) {
        // Err only means nobody is listening.
        if let Ok(receivers) = self.sender.send(event) {
            debug!("Change event delivered to {} subscribers", receivers);
        }
    }

    fn subscribe(&self, filter: ChangeFilter) -> ChangeSubscription {
        ChangeSubscription::new(self.sender.subscribe(), filter)
    }
}
