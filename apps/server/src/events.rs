use dexfeed_core::events::{TokenEventSink, TokenUpdate};
use tokio::sync::broadcast;

/// Lightweight broadcast bus that fans out token updates to any connected clients.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TokenUpdate>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TokenUpdate> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: TokenUpdate) {
        // No subscribers is not an error; lagging ones drop events.
        let _ = self.sender.send(event);
    }
}

impl TokenEventSink for EventBus {
    fn emit(&self, event: TokenUpdate) {
        self.publish(event);
    }
}
