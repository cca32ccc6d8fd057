//! Polling change detector that turns cache contents into token events.

use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::watcher_model::{LastBroadcast, WatcherConfig};
use crate::cache::TokenCache;
use crate::constants::TOKEN_KEY_PREFIX;
use crate::events::{TokenEventSink, TokenUpdate};

/// Scans every cached token on a fixed period and emits a
/// [`TokenUpdate`] for each one that is new or moved past a threshold.
///
/// Last-broadcast values live only in this struct, so the first poll after
/// a restart broadcasts every cached token. Tokens that leave the cache are
/// forgotten, and broadcast again as new if they come back.
pub struct ChangeWatcher {
    cache: TokenCache,
    sink: Arc<dyn TokenEventSink>,
    config: WatcherConfig,
    last: HashMap<String, LastBroadcast>,
}

impl ChangeWatcher {
    pub fn new(cache: TokenCache, sink: Arc<dyn TokenEventSink>, config: WatcherConfig) -> Self {
        Self {
            cache,
            sink,
            config,
            last: HashMap::new(),
        }
    }

    /// One scan over the cache. Returns the number of events emitted.
    pub async fn poll_once(&mut self) -> usize {
        let mut emitted = 0;
        let mut seen = HashSet::new();

        for key in self.cache.token_keys().await {
            // Absent (expired) and undecodable entries read as None
            let Some(record) = self.cache.get_key(&key).await else {
                continue;
            };

            let address = if record.asset_id.is_empty() {
                key.strip_prefix(TOKEN_KEY_PREFIX).unwrap_or(&key).to_string()
            } else {
                record.asset_id.clone()
            };

            seen.insert(address.clone());
            let next = LastBroadcast::from_record(&record);
            let should_emit = match self.last.get(&address) {
                Some(previous) => previous.changed(&next, &self.config),
                None => true,
            };
            if !should_emit {
                continue;
            }

            self.last.insert(address.clone(), next);
            let mut event = TokenUpdate::from_record(&record);
            event.token_address = address;
            debug!("Broadcasting update for {}", event.token_address);
            self.sink.emit(event);
            emitted += 1;
        }

        self.last.retain(|address, _| seen.contains(address));
        emitted
    }

    /// Number of tokens with a recorded broadcast.
    pub fn tracked(&self) -> usize {
        self.last.len()
    }

    /// Run the poll loop forever on its own task.
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Change watcher started ({:?} interval)", self.config.interval);

            let mut ticker = interval(self.config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let emitted = self.poll_once().await;
                if emitted > 0 {
                    debug!("Change watcher emitted {} updates", emitted);
                }
            }
        })
    }
}
