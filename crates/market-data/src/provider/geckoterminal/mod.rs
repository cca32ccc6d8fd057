//! GeckoTerminal token data provider.
//!
//! GeckoTerminal needs the network in the URL, so a lookup tries a fixed
//! list of chains in order and stops at the first one that knows the token.
//! Each attempt spends one request of the provider's budget.
//!
//! Public API is limited to 30 calls per minute.
//! API documentation: https://www.geckoterminal.com/dex-api

pub mod models;

use std::borrow::Cow;

use async_trait::async_trait;
use tracing::debug;

use super::client::ProviderClient;
use super::normalizer::{normalize_geckoterminal, GECKOTERMINAL_ID};
use super::traits::TokenSource;
use crate::errors::MarketDataError;
use crate::models::TokenRecord;
use crate::registry::RateLimitConfig;

const BASE_URL: &str = "https://api.geckoterminal.com/api/v2/simple/networks";

/// Networks tried, in order.
pub const DEFAULT_CHAINS: &[&str] = &["solana", "ethereum", "base"];

/// GeckoTerminal provider.
pub struct GeckoTerminalProvider {
    client: ProviderClient,
    base_url: String,
    chains: Vec<String>,
}

impl GeckoTerminalProvider {
    pub fn new(client: ProviderClient) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: ProviderClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            chains: DEFAULT_CHAINS.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Replace the networks tried.
    pub fn with_chains(mut self, chains: Vec<String>) -> Self {
        self.chains = chains;
        self
    }
}

#[async_trait]
impl TokenSource for GeckoTerminalProvider {
    fn id(&self) -> &'static str {
        GECKOTERMINAL_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig::per_minute(30)
    }

    /// Try each chain; a failed request means "not on this chain".
    async fn fetch_token(&self, address: &str) -> Result<Option<TokenRecord>, MarketDataError> {
        let provider = Cow::Borrowed(GECKOTERMINAL_ID);
        let encoded = urlencoding::encode(address);

        for chain in &self.chains {
            let url = format!("{}/{}/tokens/{}", self.base_url, chain, encoded);
            match self.client.get_json(&provider, &url).await {
                Ok(raw) => {
                    if let Some(record) = normalize_geckoterminal(&raw, chain, address) {
                        return Ok(Some(record));
                    }
                }
                Err(e) => {
                    debug!("GeckoTerminal: {} not found on {}: {}", address, chain, e);
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{JsonFetcher, RateLimiter};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Serves canned payloads by chain segment and records requested URLs.
    struct ChainFetcher {
        found_on: &'static str,
        failing: &'static str,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl JsonFetcher for ChainFetcher {
        async fn get_json(&self, provider: &str, url: &str) -> Result<Value, MarketDataError> {
            self.requested.lock().unwrap().push(url.to_string());
            if url.contains(&format!("/{}/", self.failing)) {
                return Err(MarketDataError::HttpStatus {
                    provider: provider.to_string(),
                    status: 404,
                });
            }
            if url.contains(&format!("/{}/", self.found_on)) {
                return Ok(json!({ "data": { "attributes": { "price_usd": "3.75" } } }));
            }
            Ok(json!({ "data": null }))
        }
    }

    fn provider(fetcher: Arc<ChainFetcher>) -> GeckoTerminalProvider {
        let client = ProviderClient::new(fetcher, Arc::new(RateLimiter::new()));
        GeckoTerminalProvider::with_base_url(client, "http://gecko.test")
    }

    #[tokio::test]
    async fn test_stops_at_first_chain_with_data() {
        let fetcher = Arc::new(ChainFetcher {
            found_on: "ethereum",
            failing: "none",
            requested: Mutex::new(Vec::new()),
        });

        let record = provider(fetcher.clone())
            .fetch_token("0xabc")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.chain, "ethereum");
        let requested = fetcher.requested.lock().unwrap();
        assert_eq!(
            *requested,
            vec![
                "http://gecko.test/solana/tokens/0xabc".to_string(),
                "http://gecko.test/ethereum/tokens/0xabc".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_chain_falls_through_to_next_chain() {
        let fetcher = Arc::new(ChainFetcher {
            found_on: "base",
            failing: "solana",
            requested: Mutex::new(Vec::new()),
        });

        let record = provider(fetcher.clone()).fetch_token("0xabc").await.unwrap();

        assert_eq!(record.map(|r| r.chain), Some("base".to_string()));
        assert_eq!(fetcher.requested.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_everywhere_is_none() {
        let fetcher = Arc::new(ChainFetcher {
            found_on: "none",
            failing: "ethereum",
            requested: Mutex::new(Vec::new()),
        });

        let record = provider(fetcher).fetch_token("0xabc").await.unwrap();
        assert!(record.is_none());
    }
}
