//! Token data provider abstractions and implementations.
//!
//! This module contains:
//! - The `TokenSource` and `TokenDiscovery` traits that providers implement
//! - The shared `ProviderClient` (rate limiter admission + retrying fetch)
//! - Per-provider normalizers into the canonical `TokenRecord`
//! - Concrete providers (DexScreener, Jupiter, GeckoTerminal)
//!
//! Providers never merge or cache; they return one normalized record (or
//! `None`) per lookup and leave precedence to the registry.

mod client;
mod normalizer;
mod traits;

pub mod dexscreener;
pub mod geckoterminal;
pub mod jupiter;

// Re-exports
pub use client::ProviderClient;
pub use normalizer::{
    decimal_from_value, normalize_dexscreener, normalize_geckoterminal, normalize_jupiter,
    normalize_pair, DEXSCREENER_ID, GECKOTERMINAL_ID, JUPITER_ID,
};
pub use traits::{TokenDiscovery, TokenSource};
