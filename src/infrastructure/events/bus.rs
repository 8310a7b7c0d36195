use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

/// Process-wide catalog notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CatalogEvent {
    /// Something in the catalog was written. Open listings should re-fetch.
    ContentChanged,
}

impl CatalogEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CatalogEvent::ContentChanged => "content-changed",
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Fire and forget. Having no subscribers is not an error.
    pub fn publish(&self, event: CatalogEvent) {
        let receivers = self.sender.send(event).unwrap_or(0);
        debug!(event = event.name(), receivers, "Published catalog event");
    }

    pub fn content_changed(&self) {
        self.publish(CatalogEvent::ContentChanged);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
