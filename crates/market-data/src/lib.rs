//! Dexfeed Market Data Crate
//!
//! This crate provides provider-agnostic token market data fetching for
//! dexfeed.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Multiple providers: DexScreener, Jupiter, GeckoTerminal
//! - Per-provider fixed-window rate limiting
//! - Retry with exponential backoff on transport and status failures
//! - Normalization of every provider payload into one canonical record
//! - Deterministic, precedence-based merging across providers
//!
//! # Architecture
//!
//! ```text
//!                          +------------------+
//!                          |  SourceRegistry  |  (concurrent fan-out)
//!                          +------------------+
//!                            |      |      |
//!                            v      v      v
//!                          +------------------+
//!                          |   TokenSource    |  (DexScreener, Jupiter, ...)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | ProviderClient   |  (RateLimiter + RetryingFetcher)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   Normalizer     |  (raw JSON -> TokenRecord)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  merge_records   |  (MergePolicy precedence)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`TokenRecord`] - Canonical, merged market data for one token
//! - [`TokenSource`] - Trait implemented by each provider adapter
//! - [`SourceRegistry`] - Fan-out, failure isolation and merge
//! - [`RateLimiter`] - Admission gate shared by all adapters
//!
//! # Type Aliases
//!
//! - [`ProviderId`] - Provider identifier (e.g., "dexscreener")
//! - [`TokenAddress`] - Token address / mint

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

// Re-export all public types from models
pub use models::{ProviderId, TokenAddress, TokenRecord};

// Re-export provider types
pub use provider::dexscreener::models::DexPair;
pub use provider::dexscreener::DexScreenerProvider;
pub use provider::geckoterminal::GeckoTerminalProvider;
pub use provider::jupiter::JupiterProvider;
pub use provider::{ProviderClient, TokenDiscovery, TokenSource};

// Re-export registry types
pub use registry::{
    merge_records, FetchDiagnostics, JsonFetcher, MergePolicy, RateLimitConfig, RateLimiter,
    RetryPolicy, RetryingFetcher, SourceRegistry,
};

// Re-export error types
pub use errors::{MarketDataError, RetryClass};
