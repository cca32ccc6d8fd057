//! Token event sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::TokenUpdate;

/// Trait for receiving token change events.
///
/// The change watcher emits through this trait; the server implements it to
/// forward events to connected subscribers.
///
/// # Design Rules
///
/// - `emit()` must be fast and non-blocking (no network calls, no store writes)
/// - Failure to deliver must not affect the watcher (best-effort)
pub trait TokenEventSink: Send + Sync {
    /// Emit a single token update.
    fn emit(&self, event: TokenUpdate);
}

/// No-op implementation for tests or contexts without subscribers.
#[derive(Clone, Default)]
pub struct NoOpTokenEventSink;

impl TokenEventSink for NoOpTokenEventSink {
    fn emit(&self, _event: TokenUpdate) {}
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockTokenEventSink {
    events: Arc<Mutex<Vec<TokenUpdate>>>,
}

impl MockTokenEventSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<TokenUpdate> {
        self.lock().clone()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Returns the number of collected events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no events have been collected.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TokenUpdate>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenEventSink for MockTokenEventSink {
    fn emit(&self, event: TokenUpdate) {
        self.lock().push(event);
    }
}
