use std::time::Duration;

/// Prefix of every per-token cache key
pub const TOKEN_KEY_PREFIX: &str = "token:";

/// Key holding the discovered token universe
pub const TOKEN_LIST_KEY: &str = "token:list";

/// Pattern matching every token key (including the universe list)
pub const TOKEN_KEY_PATTERN: &str = "token:*";

/// TTL for per-token cache entries
pub const TOKEN_CACHE_TTL: Duration = Duration::from_secs(30);

/// Universe refresh period
pub const UNIVERSE_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Pre-warm period
pub const PREWARM_INTERVAL: Duration = Duration::from_secs(2 * 60);

/// Live sweep period
pub const LIVE_SWEEP_INTERVAL: Duration = Duration::from_secs(15);

/// Change watcher poll period
pub const WATCH_INTERVAL: Duration = Duration::from_secs(2);

/// Tokens kept in the discovered universe
pub const UNIVERSE_LIMIT: usize = 50;

/// Tokens written by each pre-warm run
pub const PREWARM_LIMIT: usize = 50;

/// Tokens refreshed by each live sweep
pub const LIVE_SWEEP_LIMIT: usize = 30;

/// Discovery query used by the scheduler
pub const DISCOVERY_QUERY: &str = "solana";

/// Maximum results returned by a cached search
pub const SEARCH_RESULT_LIMIT: usize = 20;

/// Default page size for cached listings
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Cache key for a token address.
pub fn token_key(address: &str) -> String {
    format!("{}{}", TOKEN_KEY_PREFIX, address)
}
