//! Property-based integration tests for cached listings and change detection.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::collections::HashSet;

use dexfeed_core::tokens::{paginate, ListQuery, SortField};
use dexfeed_core::watcher::{LastBroadcast, WatcherConfig};
use dexfeed_market_data::TokenRecord;

// =============================================================================
// Generators
// =============================================================================

/// Records with unique addresses and arbitrary (possibly missing) volumes.
fn arb_records() -> impl Strategy<Value = Vec<TokenRecord>> {
    proptest::collection::vec(proptest::option::of(0u32..1_000_000), 0..60).prop_map(|volumes| {
        volumes
            .into_iter()
            .enumerate()
            .map(|(i, volume)| {
                let mut record =
                    TokenRecord::new(format!("tok{}", i), "solana", Cow::Borrowed("dexscreener"));
                record.volume_24h_usd = volume.map(Decimal::from);
                record
            })
            .collect()
    })
}

fn arb_broadcast() -> impl Strategy<Value = LastBroadcast> {
    (0i64..1_000_000_000, 0i64..100_000).prop_map(|(price, volume)| LastBroadcast {
        price_usd: Decimal::new(price, 8),
        volume_24h_usd: Decimal::from(volume),
        liquidity_usd: Decimal::ZERO,
    })
}

fn walk_pages(records: &[TokenRecord], limit: usize, min_volume: Decimal) -> Vec<TokenRecord> {
    let mut query = ListQuery {
        limit,
        min_volume,
        sort_by: SortField::Volume24hUsd,
        ..ListQuery::default()
    };
    let mut seen = Vec::new();

    loop {
        let page = paginate(records.to_vec(), &query);
        seen.extend(page.data);
        match page.next_cursor {
            Some(cursor) => query.cursor = Some(cursor),
            None => return seen,
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Following cursors visits every matching record exactly once.
    #[test]
    fn prop_cursor_walk_covers_every_record_once(
        records in arb_records(),
        limit in 1usize..25,
    ) {
        let seen = walk_pages(&records, limit, Decimal::ZERO);

        let unique: HashSet<&str> = seen.iter().map(|r| r.asset_id.as_str()).collect();
        prop_assert_eq!(seen.len(), records.len());
        prop_assert_eq!(unique.len(), records.len());
    }

    /// Walked pages are in descending volume order with missing values last.
    #[test]
    fn prop_pages_are_sorted_descending(records in arb_records(), limit in 1usize..25) {
        let seen = walk_pages(&records, limit, Decimal::ZERO);
        let volumes: Vec<Decimal> = seen
            .iter()
            .map(|r| r.volume_24h_usd.unwrap_or(Decimal::ZERO))
            .collect();

        prop_assert!(volumes.windows(2).all(|w| w[0] >= w[1]));
    }

    /// The volume filter drops exactly the low and missing volumes.
    #[test]
    fn prop_min_volume_filter_is_exact(
        records in arb_records(),
        min in 1u32..1_000_000,
    ) {
        let min = Decimal::from(min);
        let expected = records
            .iter()
            .filter(|r| r.volume_24h_usd.is_some_and(|v| v >= min))
            .count();

        let page = paginate(records, &ListQuery { min_volume: min, ..ListQuery::default() });
        prop_assert_eq!(page.total, expected);
        prop_assert!(page.data.iter().all(|r| r.volume_24h_usd.is_some_and(|v| v >= min)));
    }

    /// Identical observations never trigger a broadcast.
    #[test]
    fn prop_unchanged_values_never_broadcast(value in arb_broadcast()) {
        prop_assert!(!value.changed(&value, &WatcherConfig::default()));
    }

    /// A broadcast happens iff price or volume moved strictly past its threshold.
    #[test]
    fn prop_broadcast_iff_threshold_exceeded(a in arb_broadcast(), b in arb_broadcast()) {
        let config = WatcherConfig::default();
        let expected = (b.price_usd - a.price_usd).abs() > config.price_epsilon
            || (b.volume_24h_usd - a.volume_24h_usd).abs() > config.volume_epsilon;

        prop_assert_eq!(a.changed(&b, &config), expected);
    }
}
