//! Rate-limited JSON client shared by the provider adapters.

use std::sync::Arc;

use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::ProviderId;
use crate::registry::{JsonFetcher, RateLimiter};

/// Admission gate plus retrying fetch, in that order.
///
/// Cheap to clone; every adapter built from the same client shares one
/// limiter, keyed by provider id.
#[derive(Clone)]
pub struct ProviderClient {
    fetcher: Arc<dyn JsonFetcher>,
    limiter: Arc<RateLimiter>,
}

impl ProviderClient {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, limiter: Arc<RateLimiter>) -> Self {
        Self { fetcher, limiter }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Wait for `provider`'s budget, then GET `url` with retry.
    pub async fn get_json(
        &self,
        provider: &ProviderId,
        url: &str,
    ) -> Result<Value, MarketDataError> {
        self.limiter.admit(provider).await;
        self.fetcher.get_json(provider, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RateLimitConfig;
    use async_trait::async_trait;
    use serde_json::json;
    use std::borrow::Cow;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Default)]
    struct RecordingFetcher {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl JsonFetcher for RecordingFetcher {
        async fn get_json(&self, _provider: &str, url: &str) -> Result<Value, MarketDataError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(json!({}))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_json_waits_for_next_window() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let limiter = Arc::new(RateLimiter::new());
        let provider: ProviderId = Cow::Borrowed("dexscreener");
        limiter.configure(&provider, RateLimitConfig::new(1, Duration::from_secs(1)));
        let client = ProviderClient::new(fetcher.clone(), limiter);

        let start = Instant::now();
        client.get_json(&provider, "http://a.test").await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(1));

        client.get_json(&provider, "http://b.test").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert_eq!(
            *fetcher.requested.lock().unwrap(),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_budgets_are_per_provider() {
        let limiter = Arc::new(RateLimiter::new());
        let busy: ProviderId = Cow::Borrowed("geckoterminal");
        let idle: ProviderId = Cow::Borrowed("jupiter");
        limiter.configure(&busy, RateLimitConfig::new(1, Duration::from_secs(60)));
        let client = ProviderClient::new(Arc::new(RecordingFetcher::default()), limiter);

        let start = Instant::now();
        client.get_json(&busy, "http://a.test").await.unwrap();
        client.get_json(&idle, "http://b.test").await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(1));
    }
}
