//! Token source trait definitions.
//!
//! This module defines the `TokenSource` trait every provider adapter
//! implements, and the `TokenDiscovery` trait for providers that can list
//! the current universe of tradeable tokens.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::TokenRecord;
use crate::registry::RateLimitConfig;

/// Trait for token data providers.
///
/// An adapter composes admission through the shared rate limiter, a
/// retrying fetch, and its provider's normalizer. The registry uses `id`,
/// `priority` and `rate_limit` to configure and order sources.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Unique identifier for this provider (e.g., "dexscreener").
    ///
    /// Used for logging, rate limit keys and the record's `sources` list.
    fn id(&self) -> &'static str;

    /// Merge precedence for numeric fields.
    ///
    /// Lower values = higher precedence. The lowest value in a registry is
    /// the primary provider. Default is 10.
    fn priority(&self) -> u8 {
        10
    }

    /// Published or observed rate ceiling for this provider.
    fn rate_limit(&self) -> RateLimitConfig;

    /// Fetch and normalize data for one token.
    ///
    /// Returns `Ok(None)` when the provider has no data for the token.
    async fn fetch_token(&self, address: &str) -> Result<Option<TokenRecord>, MarketDataError>;
}

/// Providers that can list the most liquid tokens for a query.
#[async_trait]
pub trait TokenDiscovery: Send + Sync {
    /// Return up to `limit` normalized records, most liquid first.
    async fn discover_top_tokens(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<TokenRecord>, MarketDataError>;
}
