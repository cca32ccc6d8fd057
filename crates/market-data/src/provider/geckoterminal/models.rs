//! GeckoTerminal API response models.

use serde::Deserialize;
use serde_json::Value;

use crate::provider::normalizer::lenient;

/// Response from `/simple/networks/{chain}/tokens/{address}`
#[derive(Debug, Default, Deserialize)]
pub struct GeckoTokenResponse {
    pub data: Option<GeckoTokenData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeckoTokenData {
    pub attributes: Option<GeckoTokenAttributes>,
    // Note: id, type and relationships exist but are not needed
}

/// Token attributes. Numbers are decimal strings.
#[derive(Debug, Default, Deserialize)]
pub struct GeckoTokenAttributes {
    pub name: Option<Value>,
    pub symbol: Option<Value>,
    pub price_usd: Option<Value>,
    pub market_cap_usd: Option<Value>,
    #[serde(alias = "total_reserve_in_usd")]
    pub reserve_in_usd: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub volume_usd: Option<GeckoWindows>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_percent_change: Option<GeckoWindows>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeckoWindows {
    pub h1: Option<Value>,
    pub h24: Option<Value>,
}
