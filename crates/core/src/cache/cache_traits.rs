use async_trait::async_trait;
use std::time::Duration;

use crate::errors::CacheError;

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Key-value store with store-enforced expiry.
///
/// Values are serialized strings; entries are replaced wholesale, never
/// updated in place. Expired entries are simply absent.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`; `None` ttl means no expiry.
    async fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()>;

    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Keys matching a glob `pattern` (`*` and `?` wildcards).
    async fn list_keys(&self, pattern: &str) -> CacheResult<Vec<String>>;
}
