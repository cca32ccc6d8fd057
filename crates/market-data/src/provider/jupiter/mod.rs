//! Jupiter price provider.
//!
//! Jupiter is an aggregator rather than an AMM: it reports a USD price for
//! Solana mints and nothing else, so it only contributes `price_usd`.

pub mod models;

use std::borrow::Cow;

use async_trait::async_trait;
use tracing::debug;

use super::client::ProviderClient;
use super::normalizer::{normalize_jupiter, JUPITER_ID};
use super::traits::TokenSource;
use crate::errors::MarketDataError;
use crate::models::TokenRecord;
use crate::registry::RateLimitConfig;

const BASE_URL: &str = "https://price.jup.ag/v4";

/// Jupiter price provider.
pub struct JupiterProvider {
    client: ProviderClient,
    base_url: String,
}

impl JupiterProvider {
    pub fn new(client: ProviderClient) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: ProviderClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TokenSource for JupiterProvider {
    fn id(&self) -> &'static str {
        JUPITER_ID
    }

    fn priority(&self) -> u8 {
        3
    }

    fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig::per_minute(300)
    }

    async fn fetch_token(&self, address: &str) -> Result<Option<TokenRecord>, MarketDataError> {
        let url = format!("{}/price?ids={}", self.base_url, urlencoding::encode(address));
        let raw = self
            .client
            .get_json(&Cow::Borrowed(JUPITER_ID), &url)
            .await?;

        let record = normalize_jupiter(&raw, address);
        if record.is_none() {
            debug!("Jupiter: no price for {}", address);
        }
        Ok(record)
    }
}
