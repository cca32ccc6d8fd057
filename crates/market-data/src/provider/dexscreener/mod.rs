//! DexScreener token data provider.
//!
//! The primary source: the most complete payload (price, native price,
//! liquidity, volume, price changes, transaction counts, venue) and the only
//! provider used for discovery.
//!
//! Public API allows 300 requests per minute on the token endpoints.
//! API documentation: https://docs.dexscreener.com/api/reference

pub mod models;

use std::borrow::Cow;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use self::models::{DexPair, TokenPairsResponse};
use super::client::ProviderClient;
use super::normalizer::{decimal_from_value, normalize_dexscreener, normalize_pair, DEXSCREENER_ID};
use super::traits::{TokenDiscovery, TokenSource};
use crate::errors::MarketDataError;
use crate::models::{ProviderId, TokenRecord};
use crate::registry::RateLimitConfig;

const BASE_URL: &str = "https://api.dexscreener.com/latest/dex";

/// DexScreener provider.
pub struct DexScreenerProvider {
    client: ProviderClient,
    base_url: String,
}

impl DexScreenerProvider {
    pub fn new(client: ProviderClient) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    /// Point the provider at a different host (mirrors, tests).
    pub fn with_base_url(client: ProviderClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn provider_id() -> ProviderId {
        Cow::Borrowed(DEXSCREENER_ID)
    }
}

#[async_trait]
impl TokenSource for DexScreenerProvider {
    fn id(&self) -> &'static str {
        DEXSCREENER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig::per_minute(300)
    }

    async fn fetch_token(&self, address: &str) -> Result<Option<TokenRecord>, MarketDataError> {
        let url = format!("{}/tokens/{}", self.base_url, urlencoding::encode(address));
        let raw = self.client.get_json(&Self::provider_id(), &url).await?;

        let record = normalize_dexscreener(&raw, address);
        if record.is_none() {
            debug!("DexScreener: no pairs for {}", address);
        }
        Ok(record)
    }
}

#[async_trait]
impl TokenDiscovery for DexScreenerProvider {
    async fn discover_top_tokens(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<TokenRecord>, MarketDataError> {
        let url = format!("{}/search/?q={}", self.base_url, urlencoding::encode(query));
        let raw = self.client.get_json(&Self::provider_id(), &url).await?;

        let response =
            TokenPairsResponse::deserialize(&raw).map_err(|e| MarketDataError::InvalidResponse {
                provider: DEXSCREENER_ID.to_string(),
                message: format!("Failed to parse search response: {}", e),
            })?;

        let records = rank_by_liquidity(response.pairs.unwrap_or_default(), limit);
        debug!("DexScreener: discovered {} tokens for '{}'", records.len(), query);
        Ok(records)
    }
}

/// Keep pairs that report liquidity, most liquid first, one record per
/// base token.
fn rank_by_liquidity(pairs: Vec<DexPair>, limit: usize) -> Vec<TokenRecord> {
    let mut liquid: Vec<(Decimal, DexPair)> = pairs
        .into_iter()
        .filter_map(|pair| {
            let liquidity = decimal_from_value(pair.liquidity_usd())?;
            (liquidity > Decimal::ZERO).then_some((liquidity, pair))
        })
        .collect();
    liquid.sort_by(|a, b| b.0.cmp(&a.0));

    let mut records: Vec<TokenRecord> = Vec::with_capacity(limit.min(liquid.len()));
    for (_, pair) in liquid {
        if records.len() >= limit {
            break;
        }
        let Some(address) = pair.base_address() else {
            warn!(
                "DexScreener: skipping pair {:?} without base token address",
                pair.pair_address
            );
            continue;
        };
        if records.iter().any(|r| r.asset_id == address) {
            continue;
        }
        records.push(normalize_pair(&pair, address));
    }
    records
}
