//! Maps each provider's raw payload into a [`TokenRecord`].
//!
//! Missing optional fields become `None`, never errors and never zero. A
//! normalizer returns `None` only when the payload does not describe the
//! token at all (empty result set, missing data envelope, or a shape that
//! does not match the provider's model).

use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use super::dexscreener::models::{DexPair, TokenPairsResponse};
use super::geckoterminal::models::GeckoTokenResponse;
use super::jupiter::models::JupiterPriceResponse;
use crate::models::TokenRecord;

pub const DEXSCREENER_ID: &str = "dexscreener";
pub const JUPITER_ID: &str = "jupiter";
pub const GECKOTERMINAL_ID: &str = "geckoterminal";

/// Chain reported when the provider omits it.
const UNKNOWN_CHAIN: &str = "unknown";

/// Normalize a DexScreener `/tokens/{address}` payload.
///
/// Uses the first pair, which DexScreener orders by liquidity.
pub fn normalize_dexscreener(raw: &Value, address: &str) -> Option<TokenRecord> {
    let response: TokenPairsResponse = decode(raw, DEXSCREENER_ID)?;
    let pair = response.pairs?.into_iter().next()?;
    Some(normalize_pair(&pair, address))
}

/// Normalize a single DexScreener pair for `address`.
pub fn normalize_pair(pair: &DexPair, address: &str) -> TokenRecord {
    let chain =
        string_from_value(pair.chain_id.as_ref()).unwrap_or_else(|| UNKNOWN_CHAIN.to_string());
    let mut record = TokenRecord::new(address, chain, Cow::Borrowed(DEXSCREENER_ID));

    if let Some(base) = &pair.base_token {
        record.name = string_from_value(base.name.as_ref());
        record.symbol = string_from_value(base.symbol.as_ref());
    }

    record.price_usd = decimal_from_value(pair.price_usd.as_ref());
    record.price_native = decimal_from_value(pair.price_native.as_ref());
    record.market_cap_usd = decimal_from_value(pair.market_cap.as_ref())
        .or_else(|| decimal_from_value(pair.fdv.as_ref()));
    record.liquidity_usd = decimal_from_value(pair.liquidity_usd());

    if let Some(volume) = &pair.volume {
        record.volume_24h_usd = decimal_from_value(volume.h24.as_ref());
    }
    if let Some(change) = &pair.price_change {
        record.price_change_1h = decimal_from_value(change.h1.as_ref());
        record.price_change_24h = decimal_from_value(change.h24.as_ref());
        record.price_change_7d = decimal_from_value(change.h168.as_ref());
    }

    // Only counted when both sides are reported
    record.transaction_count_24h = pair
        .txns
        .as_ref()
        .and_then(|t| t.h24.as_ref())
        .and_then(|h24| {
            let buys = count_from_value(h24.buys.as_ref())?;
            let sells = count_from_value(h24.sells.as_ref())?;
            buys.checked_add(sells)
        });

    record.pair_address = string_from_value(pair.pair_address.as_ref());
    record.venue_name = string_from_value(pair.dex_id.as_ref());
    record
}

/// Normalize a Jupiter price payload. Jupiter only reports price, always on
/// Solana; a payload without a usable price for `address` yields `None`.
pub fn normalize_jupiter(raw: &Value, address: &str) -> Option<TokenRecord> {
    let response: JupiterPriceResponse = decode(raw, JUPITER_ID)?;
    let entry = response.data?.remove(address)?;
    let price = decimal_from_value(entry.price.as_ref())?;

    let mut record = TokenRecord::new(address, "solana", Cow::Borrowed(JUPITER_ID));
    record.price_usd = Some(price);
    Some(record)
}

/// Normalize a GeckoTerminal token payload found on `chain`.
pub fn normalize_geckoterminal(raw: &Value, chain: &str, address: &str) -> Option<TokenRecord> {
    let response: GeckoTokenResponse = decode(raw, GECKOTERMINAL_ID)?;
    let attributes = response.data?.attributes?;

    let mut record = TokenRecord::new(address, chain, Cow::Borrowed(GECKOTERMINAL_ID));
    record.name = string_from_value(attributes.name.as_ref());
    record.symbol = string_from_value(attributes.symbol.as_ref());
    record.price_usd = decimal_from_value(attributes.price_usd.as_ref());
    record.market_cap_usd = decimal_from_value(attributes.market_cap_usd.as_ref());
    record.liquidity_usd = decimal_from_value(attributes.reserve_in_usd.as_ref());
    if let Some(volume) = &attributes.volume_usd {
        record.volume_24h_usd = decimal_from_value(volume.h24.as_ref());
    }
    if let Some(change) = &attributes.price_percent_change {
        record.price_change_1h = decimal_from_value(change.h1.as_ref());
        record.price_change_24h = decimal_from_value(change.h24.as_ref());
    }
    Some(record)
}

fn decode<T: DeserializeOwned>(raw: &Value, provider: &str) -> Option<T> {
    match T::deserialize(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("{}: payload does not match expected shape: {}", provider, e);
            None
        }
    }
}

/// Parse a JSON number or numeric string into a decimal.
///
/// Blank strings, non-numeric strings and non-scalar values are `None`.
pub fn decimal_from_value(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn count_from_value(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A trimmed, non-empty JSON string. Any other value is `None`.
fn string_from_value(value: Option<&Value>) -> Option<String> {
    value?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Field deserializer that treats a value of the wrong shape as absent.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}
