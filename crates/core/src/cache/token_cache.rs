//! Typed token access on top of a [`CacheStore`].
//!
//! Store failures never escape this layer: reads degrade to a miss and
//! writes are logged and dropped, so callers can always fall back to fresh
//! provider data.

use dexfeed_market_data::provider::normalize_pair;
use dexfeed_market_data::{DexPair, TokenRecord};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::cache_traits::CacheStore;
use crate::constants::{token_key, TOKEN_KEY_PATTERN, TOKEN_LIST_KEY};

/// Any payload shape found under a `token:` key.
///
/// This process always writes canonical records, but entries written by
/// other processes sharing the store may hold a raw DexScreener pair.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CachedToken {
    Canonical(TokenRecord),
    RawPair(Box<DexPair>),
}

impl CachedToken {
    /// Convert into a canonical record; a raw pair needs a base token address.
    pub fn into_record(self) -> Option<TokenRecord> {
        match self {
            Self::Canonical(record) => Some(record),
            Self::RawPair(pair) => {
                let address = pair.base_address()?.to_string();
                Some(normalize_pair(&pair, &address))
            }
        }
    }
}

/// Decode a cached payload of either shape. Corrupt or foreign JSON is `None`.
pub fn decode_token(json: &str) -> Option<TokenRecord> {
    serde_json::from_str::<CachedToken>(json)
        .ok()?
        .into_record()
}

/// Token-shaped view of the shared cache store.
#[derive(Clone)]
pub struct TokenCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl TokenCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached record for `address`, or `None` on miss, corruption or store failure.
    pub async fn get(&self, address: &str) -> Option<TokenRecord> {
        self.get_key(&token_key(address)).await
    }

    /// Cached record stored under a full cache key.
    pub async fn get_key(&self, key: &str) -> Option<TokenRecord> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        let record = decode_token(&raw);
        if record.is_none() {
            debug!("Ignoring undecodable cache entry {}", key);
        }
        record
    }

    /// Write `record` under its token key with the standard TTL.
    ///
    /// Returns false when the write was dropped.
    pub async fn put(&self, record: &TokenRecord) -> bool {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize token {}: {}", record.asset_id, e);
                return false;
            }
        };

        match self
            .store
            .put(&token_key(&record.asset_id), json, Some(self.ttl))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache write failed for {}: {}", record.asset_id, e);
                false
            }
        }
    }

    /// Every per-token key currently cached (the universe list excluded).
    pub async fn token_keys(&self) -> Vec<String> {
        match self.store.list_keys(TOKEN_KEY_PATTERN).await {
            Ok(keys) => keys.into_iter().filter(|k| k != TOKEN_LIST_KEY).collect(),
            Err(e) => {
                warn!("Cache key scan failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Every decodable cached token record, in key order.
    pub async fn all_records(&self) -> Vec<TokenRecord> {
        let mut records = Vec::new();
        for key in self.token_keys().await {
            if let Some(record) = self.get_key(&key).await {
                records.push(record);
            }
        }
        records
    }

    /// Replace the universe list wholesale. The list does not expire.
    pub async fn put_universe(&self, records: &[TokenRecord]) -> bool {
        let json = match serde_json::to_string(records) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize token universe: {}", e);
                return false;
            }
        };

        match self.store.put(TOKEN_LIST_KEY, json, None).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache write failed for {}: {}", TOKEN_LIST_KEY, e);
                false
            }
        }
    }

    /// The last stored universe; empty when absent or unreadable.
    pub async fn universe(&self) -> Vec<TokenRecord> {
        let raw = match self.store.get(TOKEN_LIST_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Cache read failed for {}: {}", TOKEN_LIST_KEY, e);
                return Vec::new();
            }
        };

        let Ok(items) = serde_json::from_str::<Vec<Value>>(&raw) else {
            debug!("Ignoring undecodable token universe");
            return Vec::new();
        };

        items
            .into_iter()
            .filter_map(|item| CachedToken::deserialize(item).ok()?.into_record())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::errors::CacheError;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::borrow::Cow;

    use crate::cache::CacheResult;

    struct FailingStore;

    #[async_trait]
    impl CacheStore for FailingStore {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(CacheError::Unavailable("down".to_string()))
        }
        async fn put(
            &self,
            _key: &str,
            _value: String,
            _ttl: Option<Duration>,
        ) -> CacheResult<()> {
            Err(CacheError::Unavailable("down".to_string()))
        }
        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::Unavailable("down".to_string()))
        }
        async fn list_keys(&self, _pattern: &str) -> CacheResult<Vec<String>> {
            Err(CacheError::Unavailable("down".to_string()))
        }
    }

    fn record(address: &str) -> TokenRecord {
        let mut record = TokenRecord::new(address, "solana", Cow::Borrowed("dexscreener"));
        record.price_usd = Some(dec!(1.25));
        record
    }

    fn memory_cache() -> (Arc<MemoryStore>, TokenCache) {
        let store = Arc::new(MemoryStore::new());
        let cache = TokenCache::new(store.clone(), Duration::from_secs(30));
        (store, cache)
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let (_, cache) = memory_cache();
        let original = record("mint");

        assert!(cache.put(&original).await);
        let cached = cache.get("mint").await.unwrap();
        assert_eq!(cached.price_usd, Some(dec!(1.25)));
        assert_eq!(
            cached.fetched_at.timestamp_millis(),
            original.fetched_at.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let (store, cache) = memory_cache();
        store
            .put("token:mint", "{not json".to_string(), None)
            .await
            .unwrap();

        assert!(cache.get("mint").await.is_none());
    }

    #[tokio::test]
    async fn test_raw_pair_entry_is_converted() {
        let (store, cache) = memory_cache();
        let raw = r#"{
            "baseToken": { "address": "rawMint", "name": "Raw", "symbol": "RAW" },
            "priceUsd": "0.5",
            "liquidity": { "usd": 1000 },
            "volume": { "h24": 42 }
        }"#;
        store
            .put("token:rawMint", raw.to_string(), None)
            .await
            .unwrap();

        let cached = cache.get("rawMint").await.unwrap();
        assert_eq!(cached.asset_id, "rawMint");
        assert_eq!(cached.symbol.as_deref(), Some("RAW"));
        assert_eq!(cached.price_usd, Some(dec!(0.5)));
        assert_eq!(cached.liquidity_usd, Some(dec!(1000)));
    }

    #[test]
    fn test_raw_pair_with_mistyped_fields_still_decodes() {
        let raw = r#"{
            "chainId": "solana",
            "dexId": 7,
            "baseToken": { "address": "rawMint", "name": ["X"], "symbol": "RAW" },
            "priceUsd": "1.5",
            "volume": "lots"
        }"#;

        let record = decode_token(raw).unwrap();
        assert_eq!(record.asset_id, "rawMint");
        assert_eq!(record.price_usd, Some(dec!(1.5)));
        assert_eq!(record.symbol.as_deref(), Some("RAW"));
        assert!(record.name.is_none());
        assert!(record.venue_name.is_none());
        assert!(record.volume_24h_usd.is_none());
    }

    #[tokio::test]
    async fn test_raw_pair_without_address_is_skipped() {
        assert!(decode_token(r#"{ "priceUsd": "1" }"#).is_none());
        assert!(decode_token("[]").is_none());
    }

    #[tokio::test]
    async fn test_failing_store_degrades_quietly() {
        let cache = TokenCache::new(Arc::new(FailingStore), Duration::from_secs(30));

        assert!(cache.get("mint").await.is_none());
        assert!(!cache.put(&record("mint")).await);
        assert!(cache.token_keys().await.is_empty());
        assert!(cache.universe().await.is_empty());
    }

    #[tokio::test]
    async fn test_token_keys_exclude_universe_list() {
        let (_, cache) = memory_cache();
        cache.put(&record("a")).await;
        cache.put(&record("b")).await;
        cache.put_universe(&[record("a")]).await;

        assert_eq!(
            cache.token_keys().await,
            vec!["token:a".to_string(), "token:b".to_string()]
        );
        assert_eq!(cache.all_records().await.len(), 2);
    }

    #[tokio::test]
    async fn test_universe_round_trip() {
        let (_, cache) = memory_cache();
        assert!(cache.universe().await.is_empty());

        cache.put_universe(&[record("a"), record("b")]).await;
        let universe = cache.universe().await;
        let ids: Vec<&str> = universe.iter().map(|r| r.asset_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
