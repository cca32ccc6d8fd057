//! Fan-out over every registered token source with per-source isolation.
//!
//! A lookup queries all sources concurrently, waits for every one of them,
//! and merges whatever came back. A failing (or panicking) source turns into
//! a null contribution; it never aborts the others.

use std::borrow::Cow;
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};

use super::{merge_records, FetchDiagnostics, MergePolicy, RateLimiter, SourceOutcome};
use crate::errors::MarketDataError;
use crate::models::{ProviderId, TokenRecord};
use crate::provider::TokenSource;

/// Registry of token sources in fixed fan-out order.
pub struct SourceRegistry {
    sources: Vec<Arc<dyn TokenSource>>,
    policy: MergePolicy,
    rate_limiter: Arc<RateLimiter>,
}

impl SourceRegistry {
    /// Create a registry querying `sources` in the given order.
    ///
    /// Configures `rate_limiter` with each source's declared limit and derives
    /// the merge precedence from source priorities.
    pub fn new(sources: Vec<Arc<dyn TokenSource>>, rate_limiter: Arc<RateLimiter>) -> Self {
        for source in &sources {
            let provider_id: ProviderId = Cow::Borrowed(source.id());
            rate_limiter.configure(&provider_id, source.rate_limit());
        }

        let mut by_priority: Vec<&Arc<dyn TokenSource>> = sources.iter().collect();
        by_priority.sort_by_key(|s| s.priority());
        let policy = MergePolicy::new(
            by_priority
                .into_iter()
                .map(|s| Cow::Borrowed(s.id()))
                .collect(),
        );

        info!(
            "Source registry: {} sources, merge precedence {:?}",
            sources.len(),
            policy.precedence()
        );

        Self {
            sources,
            policy,
            rate_limiter,
        }
    }

    pub fn sources(&self) -> &[Arc<dyn TokenSource>] {
        &self.sources
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    /// Query every source concurrently for `address`.
    ///
    /// Returns one slot per source in fan-out order; failed sources are
    /// `None` and reported in the diagnostics.
    pub async fn fetch_all(&self, address: &str) -> (Vec<Option<TokenRecord>>, FetchDiagnostics) {
        let tasks = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let address = address.to_string();
            tokio::spawn(async move { source.fetch_token(&address).await })
        });
        let outcomes = join_all(tasks).await;

        let mut records = Vec::with_capacity(self.sources.len());
        let mut diagnostics = FetchDiagnostics::new();

        for (source, outcome) in self.sources.iter().zip(outcomes) {
            let provider_id: ProviderId = Cow::Borrowed(source.id());
            match outcome {
                Ok(Ok(Some(record))) => {
                    diagnostics.record(provider_id, SourceOutcome::Found);
                    records.push(Some(record));
                }
                Ok(Ok(None)) => {
                    diagnostics.record(provider_id, SourceOutcome::NoData);
                    records.push(None);
                }
                Ok(Err(e)) => {
                    let e = e.into_unavailable(source.id());
                    warn!("{} failed for {}: {}", source.id(), address, e);
                    diagnostics.record(
                        provider_id,
                        SourceOutcome::Failed {
                            message: e.to_string(),
                        },
                    );
                    records.push(None);
                }
                Err(e) => {
                    warn!("{} task aborted for {}: {}", source.id(), address, e);
                    diagnostics.record(
                        provider_id,
                        SourceOutcome::Failed {
                            message: e.to_string(),
                        },
                    );
                    records.push(None);
                }
            }
        }

        (records, diagnostics)
    }

    /// Fetch from every source and merge the results.
    ///
    /// Fails only on a blank address. `Ok(None)` means no source had data.
    pub async fn fetch_merged(
        &self,
        address: &str,
    ) -> Result<Option<TokenRecord>, MarketDataError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(MarketDataError::InvalidInput(
                "Token address must not be empty".to_string(),
            ));
        }

        let (records, diagnostics) = self.fetch_all(address).await;
        debug!("Fetch {}: {}", address, diagnostics.summary());

        Ok(merge_records(records, &self.policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RateLimitConfig;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    enum Behavior {
        Price(rust_decimal::Decimal),
        Empty,
        Fail,
        Panic,
    }

    struct MockSource {
        id: &'static str,
        priority: u8,
        behavior: Behavior,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn new(id: &'static str, priority: u8, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                id,
                priority,
                behavior,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn delayed(id: &'static str, priority: u8, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                id,
                priority,
                behavior: Behavior::Price(dec!(1)),
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TokenSource for MockSource {
        fn id(&self) -> &'static str {
            self.id
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn rate_limit(&self) -> RateLimitConfig {
            RateLimitConfig::per_minute(7)
        }

        async fn fetch_token(
            &self,
            address: &str,
        ) -> Result<Option<TokenRecord>, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.behavior {
                Behavior::Price(price) => {
                    let mut record = TokenRecord::new(address, "solana", Cow::Borrowed(self.id));
                    record.price_usd = Some(*price);
                    Ok(Some(record))
                }
                Behavior::Empty => Ok(None),
                Behavior::Fail => Err(MarketDataError::HttpStatus {
                    provider: self.id.to_string(),
                    status: 502,
                }),
                Behavior::Panic => panic!("source blew up"),
            }
        }
    }

    fn registry(sources: Vec<Arc<MockSource>>) -> SourceRegistry {
        let sources = sources
            .into_iter()
            .map(|s| s as Arc<dyn TokenSource>)
            .collect();
        SourceRegistry::new(sources, Arc::new(RateLimiter::new()))
    }

    #[test]
    fn test_policy_follows_priority() {
        let registry = registry(vec![
            MockSource::new("dexscreener", 1, Behavior::Empty),
            MockSource::new("jupiter", 3, Behavior::Empty),
            MockSource::new("geckoterminal", 2, Behavior::Empty),
        ]);

        assert_eq!(registry.policy().primary(), Some("dexscreener"));
        assert_eq!(
            registry.policy().precedence(),
            &[
                Cow::Borrowed("dexscreener"),
                Cow::Borrowed("geckoterminal"),
                Cow::Borrowed("jupiter")
            ]
        );
    }

    #[test]
    fn test_new_configures_rate_limits() {
        let registry = registry(vec![MockSource::new("dexscreener", 1, Behavior::Empty)]);
        let provider: ProviderId = Cow::Borrowed("dexscreener");

        for _ in 0..7 {
            assert!(registry.rate_limiter().try_admit(&provider));
        }
        assert!(!registry.rate_limiter().try_admit(&provider));
    }

    #[tokio::test]
    async fn test_failing_source_does_not_abort_others() {
        let registry = registry(vec![
            MockSource::new("dexscreener", 1, Behavior::Fail),
            MockSource::new("jupiter", 3, Behavior::Price(dec!(2.5))),
            MockSource::new("geckoterminal", 2, Behavior::Empty),
        ]);

        let (records, diagnostics) = registry.fetch_all("mint").await;
        assert!(records[0].is_none());
        assert!(records[1].is_some());
        assert!(records[2].is_none());
        assert_eq!(diagnostics.errors().len(), 1);
        assert_eq!(diagnostics.attempts[2].outcome, SourceOutcome::NoData);

        let merged = registry.fetch_merged("mint").await.unwrap().unwrap();
        assert_eq!(merged.price_usd, Some(dec!(2.5)));
        assert_eq!(merged.sources, vec![Cow::Borrowed("jupiter")]);
    }

    #[tokio::test]
    async fn test_panicking_source_becomes_null() {
        let registry = registry(vec![
            MockSource::new("dexscreener", 1, Behavior::Panic),
            MockSource::new("geckoterminal", 2, Behavior::Price(dec!(3))),
        ]);

        let merged = registry.fetch_merged("mint").await.unwrap().unwrap();
        assert_eq!(merged.price_usd, Some(dec!(3)));
    }

    #[tokio::test]
    async fn test_all_empty_is_none() {
        let registry = registry(vec![
            MockSource::new("dexscreener", 1, Behavior::Empty),
            MockSource::new("jupiter", 3, Behavior::Fail),
        ]);

        assert!(registry.fetch_merged("mint").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_address_is_invalid_input() {
        let source = MockSource::new("dexscreener", 1, Behavior::Empty);
        let registry = registry(vec![source.clone()]);

        let result = registry.fetch_merged("   ").await;
        assert!(matches!(result, Err(MarketDataError::InvalidInput(_))));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sources_are_queried_concurrently() {
        let registry = registry(vec![
            MockSource::delayed("dexscreener", 1, Duration::from_millis(100)),
            MockSource::delayed("jupiter", 3, Duration::from_millis(100)),
            MockSource::delayed("geckoterminal", 2, Duration::from_millis(100)),
        ]);

        let start = Instant::now();
        let (records, _) = registry.fetch_all("mint").await;

        assert_eq!(records.iter().flatten().count(), 3);
        assert!(start.elapsed() < Duration::from_millis(300));
    }
}
