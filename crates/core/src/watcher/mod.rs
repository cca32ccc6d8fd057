//! Watcher module - change detection over cached tokens.

mod watcher_model;
mod watcher_service;

pub use watcher_model::{LastBroadcast, WatcherConfig};
pub use watcher_service::ChangeWatcher;
