//! Precedence-based merge of per-provider records for one token.

use chrono::Utc;

use crate::models::{ProviderId, TokenRecord};

/// Numeric-field precedence across providers.
///
/// The first provider is the primary: its non-null numeric values always
/// win. The rest are consulted in order for fields the primary left empty.
/// Providers not listed rank after every listed one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergePolicy {
    precedence: Vec<ProviderId>,
}

impl MergePolicy {
    pub fn new(precedence: Vec<ProviderId>) -> Self {
        Self { precedence }
    }

    pub fn primary(&self) -> Option<&str> {
        self.precedence.first().map(|p| p.as_ref())
    }

    pub fn precedence(&self) -> &[ProviderId] {
        &self.precedence
    }

    fn rank(&self, record: &TokenRecord) -> usize {
        record
            .primary_source()
            .and_then(|source| self.precedence.iter().position(|p| p == source))
            .unwrap_or(self.precedence.len())
    }
}

/// Merge zero or more normalized records for the same token.
///
/// - No records: `None`.
/// - One record: returned unchanged.
/// - Otherwise identity (`asset_id`, `chain`) comes from the first record,
///   string fields are first-non-null in input order, numeric fields follow
///   `policy`, `sources` concatenates every contributor in input order, and
///   `fetched_at` is the merge time.
pub fn merge_records(
    records: Vec<Option<TokenRecord>>,
    policy: &MergePolicy,
) -> Option<TokenRecord> {
    let mut valid: Vec<TokenRecord> = records.into_iter().flatten().collect();
    if valid.len() <= 1 {
        return valid.pop();
    }

    // Stable sort keeps input order among equally ranked providers
    let mut ranked: Vec<&TokenRecord> = valid.iter().collect();
    ranked.sort_by_key(|r| policy.rank(r));

    let first = &valid[0];
    Some(TokenRecord {
        asset_id: first.asset_id.clone(),
        chain: first.chain.clone(),
        name: first_text(&valid, |r| r.name.as_ref()),
        symbol: first_text(&valid, |r| r.symbol.as_ref()),
        price_usd: first_number(&ranked, |r| r.price_usd),
        price_native: first_number(&ranked, |r| r.price_native),
        market_cap_usd: first_number(&ranked, |r| r.market_cap_usd),
        liquidity_usd: first_number(&ranked, |r| r.liquidity_usd),
        volume_24h_usd: first_number(&ranked, |r| r.volume_24h_usd),
        price_change_1h: first_number(&ranked, |r| r.price_change_1h),
        price_change_24h: first_number(&ranked, |r| r.price_change_24h),
        price_change_7d: first_number(&ranked, |r| r.price_change_7d),
        transaction_count_24h: first_number(&ranked, |r| r.transaction_count_24h),
        pair_address: first_text(&valid, |r| r.pair_address.as_ref()),
        venue_name: first_text(&valid, |r| r.venue_name.as_ref()),
        sources: valid.iter().flat_map(|r| r.sources.iter().cloned()).collect(),
        fetched_at: Utc::now(),
    })
}

fn first_text(
    records: &[TokenRecord],
    field: impl Fn(&TokenRecord) -> Option<&String>,
) -> Option<String> {
    records.iter().find_map(|r| field(r).cloned())
}

fn first_number<T>(
    ranked: &[&TokenRecord],
    field: impl Fn(&TokenRecord) -> Option<T>,
) -> Option<T> {
    ranked.iter().find_map(|r| field(*r))
}
