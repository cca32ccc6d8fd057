//! Search and pagination over cached token records.

use dexfeed_market_data::TokenRecord;

use super::tokens_model::{ListQuery, TokenPage};
use crate::constants::{token_key, SEARCH_RESULT_LIMIT};

/// Case-insensitive substring match on address or name, capped at 20.
pub fn search_records(records: Vec<TokenRecord>, query: &str) -> Vec<TokenRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    records
        .into_iter()
        .filter(|r| {
            r.asset_id.to_lowercase().contains(&needle)
                || r
                    .name
                    .as_ref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
        })
        .take(SEARCH_RESULT_LIMIT)
        .collect()
}

/// Filter, sort (descending) and slice one page.
///
/// An unknown cursor restarts from the first page. `next_cursor` is set only
/// when the page is full and more records remain.
pub fn paginate(mut records: Vec<TokenRecord>, query: &ListQuery) -> TokenPage {
    if query.min_volume > rust_decimal::Decimal::ZERO {
        records.retain(|r| r.volume_24h_usd.is_some_and(|v| v >= query.min_volume));
    }

    // Stable: ties keep key order
    records.sort_by(|a, b| query.sort_by.value_of(b).cmp(&query.sort_by.value_of(a)));

    let total = records.len();
    let start = query
        .cursor
        .as_deref()
        .and_then(|cursor| records.iter().position(|r| token_key(&r.asset_id) == cursor))
        .map_or(0, |index| index + 1);
    let end = start.saturating_add(query.limit).min(total);

    let data: Vec<TokenRecord> = records
        .into_iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();

    let next_cursor = if query.limit > 0 && data.len() == query.limit && end < total {
        data.last().map(|r| token_key(&r.asset_id))
    } else {
        None
    };

    TokenPage {
        data,
        next_cursor,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::SortField;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::borrow::Cow;

    fn record(address: &str, name: Option<&str>, volume: Option<Decimal>) -> TokenRecord {
        let mut record = TokenRecord::new(address, "solana", Cow::Borrowed("dexscreener"));
        record.name = name.map(str::to_string);
        record.volume_24h_usd = volume;
        record
    }

    fn ids(page: &[TokenRecord]) -> Vec<&str> {
        page.iter().map(|r| r.asset_id.as_str()).collect()
    }

    #[test]
    fn test_search_matches_address_or_name() {
        let records = vec![
            record("PIPEabc", None, None),
            record("xyz", Some("Pipe Token"), None),
            record("other", Some("Other"), None),
        ];

        let found = search_records(records, "pipe");
        assert_eq!(ids(&found), vec!["PIPEabc", "xyz"]);
    }

    #[test]
    fn test_search_empty_query_is_empty() {
        let records = vec![record("a", Some("A"), None)];
        assert!(search_records(records, "  ").is_empty());
    }

    #[test]
    fn test_search_caps_results() {
        let records = (0..30)
            .map(|i| record(&format!("tok{}", i), None, None))
            .collect();
        assert_eq!(search_records(records, "tok").len(), SEARCH_RESULT_LIMIT);
    }

    #[test]
    fn test_paginate_sorts_descending_with_nulls_as_zero() {
        let records = vec![
            record("a", None, Some(dec!(10))),
            record("b", None, None),
            record("c", None, Some(dec!(30))),
        ];

        let page = paginate(records, &ListQuery::default());
        assert_eq!(ids(&page.data), vec!["c", "a", "b"]);
        assert_eq!(page.total, 3);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_paginate_min_volume_drops_low_and_missing() {
        let records = vec![
            record("a", None, Some(dec!(10))),
            record("b", None, None),
            record("c", None, Some(dec!(30))),
        ];
        let query = ListQuery {
            min_volume: dec!(20),
            ..ListQuery::default()
        };

        let page = paginate(records, &query);
        assert_eq!(ids(&page.data), vec!["c"]);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_paginate_follows_cursor() {
        let records: Vec<TokenRecord> = (1..=5)
            .map(|i| record(&format!("t{}", i), None, Some(Decimal::from(i))))
            .collect();
        let first = ListQuery {
            limit: 2,
            ..ListQuery::default()
        };

        let page1 = paginate(records.clone(), &first);
        assert_eq!(ids(&page1.data), vec!["t5", "t4"]);
        assert_eq!(page1.next_cursor.as_deref(), Some("token:t4"));

        let second = ListQuery {
            cursor: page1.next_cursor.clone(),
            ..first.clone()
        };
        let page2 = paginate(records.clone(), &second);
        assert_eq!(ids(&page2.data), vec!["t3", "t2"]);

        let third = ListQuery {
            cursor: page2.next_cursor.clone(),
            ..first.clone()
        };
        let page3 = paginate(records, &third);
        assert_eq!(ids(&page3.data), vec!["t1"]);
        assert!(page3.next_cursor.is_none());
        assert_eq!(page3.total, 5);
    }

    #[test]
    fn test_paginate_unknown_cursor_restarts() {
        let records = vec![record("a", None, Some(dec!(2))), record("b", None, Some(dec!(1)))];
        let query = ListQuery {
            cursor: Some("token:gone".to_string()),
            ..ListQuery::default()
        };

        let page = paginate(records, &query);
        assert_eq!(ids(&page.data), vec!["a", "b"]);
    }

    #[test]
    fn test_paginate_by_liquidity() {
        let mut low = record("low", None, None);
        low.liquidity_usd = Some(dec!(1));
        let mut high = record("high", None, None);
        high.liquidity_usd = Some(dec!(100));
        let query = ListQuery {
            sort_by: SortField::from_query("liquidityUsd"),
            ..ListQuery::default()
        };

        let page = paginate(vec![low, high], &query);
        assert_eq!(ids(&page.data), vec!["high", "low"]);
    }

    #[test]
    fn test_sort_field_from_query() {
        assert_eq!(SortField::from_query("priceChange7d"), SortField::PriceChange7d);
        assert_eq!(SortField::from_query("bogus"), SortField::Volume24hUsd);
    }
}
