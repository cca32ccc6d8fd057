//! Token events module.
//!
//! Provides the token update event and the sink trait the change watcher
//! emits through. Runtime adapters (the server's event bus) implement the
//! sink to deliver events to subscribers.

mod sink;
mod token_event;

pub use sink::*;
pub use token_event::*;
