use rust_decimal::Decimal;
use std::time::Duration;

use dexfeed_market_data::TokenRecord;

use crate::constants::WATCH_INTERVAL;

/// Poll period and change thresholds for the watcher.
#[derive(Clone, Debug)]
pub struct WatcherConfig {
    pub interval: Duration,
    /// Price moves at or below this are ignored
    pub price_epsilon: Decimal,
    /// 24h volume moves at or below this are ignored
    pub volume_epsilon: Decimal,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            interval: WATCH_INTERVAL,
            price_epsilon: Decimal::new(1, 6),
            volume_epsilon: Decimal::from(5),
        }
    }
}

/// Values last broadcast for one token. Missing values are stored as zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LastBroadcast {
    pub price_usd: Decimal,
    pub volume_24h_usd: Decimal,
    pub liquidity_usd: Decimal,
}

impl LastBroadcast {
    pub fn from_record(record: &TokenRecord) -> Self {
        Self {
            price_usd: record.price_usd.unwrap_or_default(),
            volume_24h_usd: record.volume_24h_usd.unwrap_or_default(),
            liquidity_usd: record.liquidity_usd.unwrap_or_default(),
        }
    }

    /// Whether `next` moved far enough from these values to broadcast.
    pub fn changed(&self, next: &LastBroadcast, config: &WatcherConfig) -> bool {
        (next.price_usd - self.price_usd).abs() > config.price_epsilon
            || (next.volume_24h_usd - self.volume_24h_usd).abs() > config.volume_epsilon
    }
}
