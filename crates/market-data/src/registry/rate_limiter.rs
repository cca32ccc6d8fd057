//! Fixed-window admission gate for token data providers.
//!
//! Each provider key gets its own window with a request budget. Over-budget
//! callers are delayed until the window rolls over rather than rejected.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::time::Instant;

use crate::models::ProviderId;

/// Default budget: 60 requests per window.
const DEFAULT_MAX_REQUESTS: u32 = 60;

/// Default window length.
const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Admission window for a single provider key.
#[derive(Debug)]
struct RateWindow {
    /// Requests admitted in the current window.
    count: u32,
    /// Instant the window rolls over.
    reset_at: Instant,
}

impl RateWindow {
    /// Open a fresh window that has already admitted one request.
    fn open(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            reset_at: now + window,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.reset_at
    }
}

/// Rate limit configuration for a provider key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RateLimitConfig {
    /// Maximum requests admitted per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

impl RateLimitConfig {
    pub const fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    /// `max_requests` per minute.
    pub const fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

/// Outcome of a single admission attempt.
enum Admission {
    Granted,
    WaitUntil(Instant),
}

/// Fixed-window rate limiter for multiple providers.
///
/// Thread-safe; windows are created lazily on the first request for a key,
/// using the key's configured limits or the defaults.
pub struct RateLimiter {
    /// Per-key admission windows.
    windows: Mutex<HashMap<String, RateWindow>>,
    /// Per-key configuration overrides.
    configs: Mutex<HashMap<String, RateLimitConfig>>,
}

impl RateLimiter {
    /// Create a new rate limiter with default settings.
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            configs: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the windows mutex, recovering from poison if necessary.
    ///
    /// A poisoned window map only means a window may be slightly off,
    /// which is better than panicking the caller.
    fn lock_windows(&self) -> MutexGuard<'_, HashMap<String, RateWindow>> {
        self.windows.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter windows mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Lock the configs mutex, recovering from poison if necessary.
    fn lock_configs(&self) -> MutexGuard<'_, HashMap<String, RateLimitConfig>> {
        self.configs.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter configs mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Configure limits for a specific provider key.
    pub fn configure(&self, provider: &ProviderId, config: RateLimitConfig) {
        let mut configs = self.lock_configs();
        configs.insert(provider.to_string(), config);
        drop(configs); // Release configs lock before acquiring windows lock

        // Drop any open window so the new limits apply immediately
        let mut windows = self.lock_windows();
        windows.remove(provider.as_ref());
    }

    fn config_for(&self, provider: &str) -> RateLimitConfig {
        self.lock_configs()
            .get(provider)
            .copied()
            .unwrap_or_default()
    }

    fn try_admit_at(&self, provider: &str, now: Instant) -> Admission {
        let config = self.config_for(provider);
        let mut windows = self.lock_windows();

        if let Some(window) = windows.get_mut(provider) {
            if !window.is_expired(now) {
                if window.count < config.max_requests {
                    window.count += 1;
                    return Admission::Granted;
                }
                return Admission::WaitUntil(window.reset_at);
            }
        }

        // No window yet, or the previous one rolled over
        windows.insert(provider.to_string(), RateWindow::open(now, config.window));
        Admission::Granted
    }

    /// Admit one request for the given provider.
    ///
    /// Returns immediately while the current window has budget left. Otherwise
    /// waits until the window resets; the first caller to wake opens the next
    /// window. Callers blocked on the same reset proceed in arbitrary order.
    pub async fn admit(&self, provider: &ProviderId) {
        loop {
            match self.try_admit_at(provider, Instant::now()) {
                Admission::Granted => {
                    debug!("Rate limiter: admitted request for '{}'", provider);
                    return;
                }
                Admission::WaitUntil(reset_at) => {
                    debug!(
                        "Rate limiter: '{}' over budget, waiting {:?}",
                        provider,
                        reset_at.saturating_duration_since(Instant::now())
                    );
                    tokio::time::sleep_until(reset_at).await;
                }
            }
        }
    }

    /// Try to admit a request without waiting.
    ///
    /// Returns true if admitted, false if the window's budget is spent.
    pub fn try_admit(&self, provider: &ProviderId) -> bool {
        matches!(
            self.try_admit_at(provider, Instant::now()),
            Admission::Granted
        )
    }

    /// Forget the window for a provider.
    pub fn reset(&self, provider: &ProviderId) {
        let mut windows = self.lock_windows();
        windows.remove(provider.as_ref());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
