use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use dexfeed_market_data::{SourceRegistry, TokenRecord};

use super::listing::{paginate, search_records};
use super::tokens_model::{ListQuery, TokenPage};
use super::tokens_traits::TokenServiceTrait;
use crate::cache::TokenCache;
use crate::errors::{Error, Result};

/// Cache-aside token lookups over the multi-source registry.
///
/// Concurrent misses for the same address share one provider fan-out: the
/// first caller fetches and fills the cache while later callers wait on a
/// per-address lock and then read the fresh entry.
pub struct TokenService {
    registry: Arc<SourceRegistry>,
    cache: TokenCache,
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl TokenService {
    pub fn new(registry: Arc<SourceRegistry>, cache: TokenCache) -> Self {
        Self {
            registry,
            cache,
            inflight: DashMap::new(),
        }
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    #[cfg(test)]
    pub(crate) fn inflight_len(&self) -> usize {
        self.inflight.len()
    }

    async fn fetch_and_fill(&self, address: &str) -> Result<Option<TokenRecord>> {
        let slot = InflightSlot::claim(&self.inflight, address);
        let _turn = slot.lock.lock().await;

        match self.cache.get(address).await {
            Some(record) => {
                debug!("Cache filled by concurrent lookup for {}", address);
                Ok(Some(record))
            }
            None => self.fetch_uncached(address).await,
        }
    }

    async fn fetch_uncached(&self, address: &str) -> Result<Option<TokenRecord>> {
        let merged = self.registry.fetch_merged(address).await?;

        match &merged {
            Some(record) => {
                if !self.cache.put(record).await {
                    warn!("Serving {} without caching it", address);
                }
            }
            None => debug!("No provider returned data for {}", address),
        }

        Ok(merged)
    }
}

/// One caller's claim on an address lock.
///
/// Dropping the last claim removes the map entry, including when the lookup
/// future is dropped before it finishes.
struct InflightSlot<'a> {
    inflight: &'a DashMap<String, Arc<Mutex<()>>>,
    address: &'a str,
    lock: Arc<Mutex<()>>,
}

impl<'a> InflightSlot<'a> {
    fn claim(inflight: &'a DashMap<String, Arc<Mutex<()>>>, address: &'a str) -> Self {
        let lock = inflight
            .entry(address.to_string())
            .or_default()
            .value()
            .clone();
        Self {
            inflight,
            address,
            lock,
        }
    }
}

impl Drop for InflightSlot<'_> {
    fn drop(&mut self) {
        drop(std::mem::take(&mut self.lock));
        self.inflight
            .remove_if(self.address, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[async_trait]
impl TokenServiceTrait for TokenService {
    async fn get_record(&self, address: &str) -> Result<Option<TokenRecord>> {
        let address = address.trim();
        if address.is_empty() {
            return Err(Error::InvalidInput(
                "Token address cannot be empty".to_string(),
            ));
        }

        if let Some(record) = self.cache.get(address).await {
            return Ok(Some(record));
        }

        self.fetch_and_fill(address).await
    }

    async fn search(&self, query: &str) -> Result<Vec<TokenRecord>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records = self.cache.all_records().await;
        Ok(search_records(records, query))
    }

    async fn list(&self, query: &ListQuery) -> Result<TokenPage> {
        let records = self.cache.all_records().await;
        Ok(paginate(records, query))
    }

    async fn universe(&self) -> Result<Vec<TokenRecord>> {
        Ok(self.cache.universe().await)
    }
}
