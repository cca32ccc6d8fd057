//! Dexfeed Core - the token aggregation and live-update pipeline.
//!
//! This crate sits between callers and the provider layer in
//! `dexfeed-market-data`. It owns the shared cache and everything that
//! reads or writes it:
//!
//! - [`tokens`] - cache-aside lookups, cached search and listings
//! - [`scheduler`] - background jobs that keep hot entries warm
//! - [`watcher`] - change detection that turns cache contents into events
//! - [`cache`] - store abstraction with in-memory and Redis backends
//! - [`events`] - token update events and the sink they are emitted through

pub mod cache;
pub mod constants;
pub mod errors;
pub mod events;
pub mod scheduler;
pub mod tokens;
pub mod watcher;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
