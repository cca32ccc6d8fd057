//! Token change event types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dexfeed_market_data::TokenRecord;

/// Event name used on the subscriber transport.
pub const TOKEN_UPDATE_EVENT: &str = "token_update";

/// A token whose price, volume or liquidity changed enough to notify.
///
/// Delivery is best-effort: subscribers may miss updates and there is no
/// replay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUpdate {
    pub token_address: String,
    pub price_usd: Option<Decimal>,
    #[serde(rename = "volume24hUsd")]
    pub volume_24h_usd: Option<Decimal>,
    pub liquidity_usd: Option<Decimal>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl TokenUpdate {
    /// Snapshot the broadcast fields of `record`.
    pub fn from_record(record: &TokenRecord) -> Self {
        Self {
            token_address: record.asset_id.clone(),
            price_usd: record.price_usd,
            volume_24h_usd: record.volume_24h_usd,
            liquidity_usd: record.liquidity_usd,
            updated_at: Utc::now(),
        }
    }
}
