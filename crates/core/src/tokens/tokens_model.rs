use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dexfeed_market_data::TokenRecord;

use crate::constants::DEFAULT_PAGE_SIZE;

/// Field a cached listing is sorted by (always descending).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Volume24hUsd,
    PriceChange1h,
    PriceChange24h,
    PriceChange7d,
    MarketCapUsd,
    LiquidityUsd,
}

impl SortField {
    /// Parse a query-string value; unknown values fall back to volume.
    pub fn from_query(value: &str) -> Self {
        match value {
            "priceChange1h" => Self::PriceChange1h,
            "priceChange24h" => Self::PriceChange24h,
            "priceChange7d" => Self::PriceChange7d,
            "marketCapUsd" => Self::MarketCapUsd,
            "liquidityUsd" => Self::LiquidityUsd,
            _ => Self::Volume24hUsd,
        }
    }

    /// Sort key for `record`; missing values sort as zero.
    pub fn value_of(&self, record: &TokenRecord) -> Decimal {
        let value = match self {
            Self::Volume24hUsd => record.volume_24h_usd,
            Self::PriceChange1h => record.price_change_1h,
            Self::PriceChange24h => record.price_change_24h,
            Self::PriceChange7d => record.price_change_7d,
            Self::MarketCapUsd => record.market_cap_usd,
            Self::LiquidityUsd => record.liquidity_usd,
        };
        value.unwrap_or(Decimal::ZERO)
    }
}

/// Paginated listing request over cached tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery {
    pub limit: usize,
    /// `token:{address}` of the last item of the previous page
    pub cursor: Option<String>,
    pub sort_by: SortField,
    /// Tokens below this 24h volume are dropped; zero disables the filter
    pub min_volume: Decimal,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            cursor: None,
            sort_by: SortField::default(),
            min_volume: Decimal::ZERO,
        }
    }
}

/// One page of a cached listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPage {
    pub data: Vec<TokenRecord>,
    pub next_cursor: Option<String>,
    /// Tokens matching the filter across all pages
    pub total: usize,
}
