use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{ProviderId, TokenAddress};

/// Canonical, provider-agnostic market data for one token.
///
/// Every numeric field is independently nullable: `None` means no source
/// reported it, never zero. Serialized with the camelCase field names the
/// subscribers and cache readers expect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    /// Token address, primary key
    #[serde(rename = "tokenAddress")]
    pub asset_id: TokenAddress,

    /// Network identifier (e.g., "solana", "ethereum")
    pub chain: String,

    #[serde(rename = "tokenName", default)]
    pub name: Option<String>,

    #[serde(rename = "tokenSymbol", default)]
    pub symbol: Option<String>,

    #[serde(default)]
    pub price_usd: Option<Decimal>,

    /// Price quoted in the chain's native asset
    #[serde(default, alias = "priceSol")]
    pub price_native: Option<Decimal>,

    #[serde(default)]
    pub market_cap_usd: Option<Decimal>,

    #[serde(default)]
    pub liquidity_usd: Option<Decimal>,

    #[serde(default)]
    pub volume_24h_usd: Option<Decimal>,

    /// Percentage change over the last hour
    #[serde(default)]
    pub price_change_1h: Option<Decimal>,

    #[serde(default)]
    pub price_change_24h: Option<Decimal>,

    #[serde(default)]
    pub price_change_7d: Option<Decimal>,

    /// Buys plus sells over the last 24 hours
    #[serde(default)]
    pub transaction_count_24h: Option<u64>,

    /// Trading venue used for pricing
    #[serde(default)]
    pub pair_address: Option<String>,

    #[serde(rename = "dexName", default)]
    pub venue_name: Option<String>,

    /// Contributing providers, in contribution precedence
    #[serde(default)]
    pub sources: Vec<ProviderId>,

    /// When this record was produced (normalization or merge completion)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub fetched_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Create an empty record attributed to a single provider.
    pub fn new(
        asset_id: impl Into<TokenAddress>,
        chain: impl Into<String>,
        source: ProviderId,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            chain: chain.into(),
            name: None,
            symbol: None,
            price_usd: None,
            price_native: None,
            market_cap_usd: None,
            liquidity_usd: None,
            volume_24h_usd: None,
            price_change_1h: None,
            price_change_24h: None,
            price_change_7d: None,
            transaction_count_24h: None,
            pair_address: None,
            venue_name: None,
            sources: vec![source],
            fetched_at: Utc::now(),
        }
    }

    /// The provider whose data leads this record, if any.
    pub fn primary_source(&self) -> Option<&str> {
        self.sources.first().map(|s| s.as_ref())
    }

    /// Whether `provider` contributed to this record.
    pub fn has_source(&self, provider: &str) -> bool {
        self.sources.iter().any(|s| s == provider)
    }
}
