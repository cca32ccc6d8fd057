//! Single outbound GET with bounded exponential-backoff retry.
//!
//! The fetcher knows nothing about rate limits or provider payloads: it issues
//! a request, retries transport and status failures, and hands back JSON.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

use crate::errors::{MarketDataError, RetryClass};

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry bounds for outbound requests.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each subsequent one.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        // 300ms, 600ms, 1200ms
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(300),
        }
    }
}

/// Run `operation` until it succeeds, fails terminally, or retries run out.
///
/// Only errors classified [`RetryClass::WithBackoff`] are retried. The last
/// error is returned unmodified.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, MarketDataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.retry_class() == RetryClass::Never => return Err(e),
            Err(e) if attempt >= policy.max_retries => {
                warn!(
                    "{}: giving up after {} attempts: {}",
                    label,
                    attempt + 1,
                    e
                );
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_for(attempt);
                debug!(
                    "{}: attempt {} failed ({}), retrying in {:?}",
                    label,
                    attempt + 1,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Fetches a URL and decodes the body as JSON.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// GET `url` on behalf of `provider`.
    ///
    /// `provider` is used only to label errors and logs.
    async fn get_json(&self, provider: &str, url: &str) -> Result<Value, MarketDataError>;
}

/// reqwest-backed [`JsonFetcher`] with retry.
pub struct RetryingFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl RetryingFetcher {
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, policy }
    }

    async fn get_once(&self, provider: &str, url: &str) -> Result<Value, MarketDataError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: provider.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: provider.to_string(),
            });
        }
        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                provider: provider.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MarketDataError::InvalidResponse {
            provider: provider.to_string(),
            message: format!("Failed to parse response: {}", e),
        })
    }
}

impl Default for RetryingFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JsonFetcher for RetryingFetcher {
    async fn get_json(&self, provider: &str, url: &str) -> Result<Value, MarketDataError> {
        debug!("GET {} ({})", url, provider);
        retry_with_backoff(self.policy, provider, || self.get_once(provider, url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn unavailable() -> MarketDataError {
        MarketDataError::HttpStatus {
            provider: "test".to_string(),
            status: 503,
        }
    }

    #[test]
    fn test_default_delays_double() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(300));
        assert_eq!(policy.delay_for(1), Duration::from_millis(600));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = Instant::now();

        let operation = move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(unavailable())
            } else {
                Ok(n)
            }
        };
        let result = retry_with_backoff(RetryPolicy::default(), "test", operation).await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 300ms + 600ms of backoff
        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_propagate_last_error() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let operation = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(unavailable())
        };
        let result = retry_with_backoff(RetryPolicy::default(), "test", operation).await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(matches!(
            result,
            Err(MarketDataError::HttpStatus { status: 503, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let operation = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(MarketDataError::InvalidResponse {
                provider: "test".to_string(),
                message: "not json".to_string(),
            })
        };
        let result = retry_with_backoff(RetryPolicy::default(), "test", operation).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(MarketDataError::InvalidResponse { .. })));
    }
}
