//! DexScreener API response models.
//!
//! Numeric fields arrive as either JSON numbers or decimal strings depending
//! on the endpoint, so they are kept as raw values and parsed by the
//! normalizer. Text fields are raw too: a mistyped field drops that field,
//! not the whole pair.

use serde::Deserialize;
use serde_json::Value;

use crate::provider::normalizer::lenient;

/// Response wrapper for `/tokens/{address}` and `/search/?q=`
#[derive(Debug, Default, Deserialize)]
pub struct TokenPairsResponse {
    #[serde(default)]
    pub pairs: Option<Vec<DexPair>>,
}

/// One trading pair. The first pair returned for a token is its primary
/// venue.
///
/// Also the "raw" payload shape some older cache writers stored verbatim.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPair {
    pub chain_id: Option<Value>,
    pub dex_id: Option<Value>,
    pub pair_address: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub base_token: Option<DexToken>,
    pub price_usd: Option<Value>,
    pub price_native: Option<Value>,
    pub market_cap: Option<Value>,
    // Older responses only carry fdv
    pub fdv: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub liquidity: Option<DexLiquidity>,
    #[serde(default, deserialize_with = "lenient")]
    pub volume: Option<DexWindows>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_change: Option<DexWindows>,
    #[serde(default, deserialize_with = "lenient")]
    pub txns: Option<DexTxnWindows>,
}

impl DexPair {
    /// Liquidity in USD as reported, without parsing.
    pub fn liquidity_usd(&self) -> Option<&Value> {
        self.liquidity.as_ref()?.usd.as_ref()
    }

    /// Base token address, if present and non-empty.
    pub fn base_address(&self) -> Option<&str> {
        self.base_token
            .as_ref()?
            .address
            .as_ref()?
            .as_str()
            .filter(|a| !a.trim().is_empty())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DexToken {
    pub address: Option<Value>,
    pub name: Option<Value>,
    pub symbol: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DexLiquidity {
    pub usd: Option<Value>,
}

/// Per-window values keyed the way DexScreener keys them (h1, h24, ...).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DexWindows {
    pub h1: Option<Value>,
    pub h24: Option<Value>,
    /// Seven-day window, only present on some pairs
    #[serde(alias = "d7")]
    pub h168: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DexTxnWindows {
    #[serde(default, deserialize_with = "lenient")]
    pub h24: Option<DexTxnCounts>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DexTxnCounts {
    pub buys: Option<Value>,
    pub sells: Option<Value>,
}
