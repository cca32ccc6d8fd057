//! Cache layer.
//!
//! - [`cache_traits`] - The backend-agnostic [`CacheStore`] contract
//! - [`memory_store`] - In-process store with lazy expiry
//! - [`redis_store`] - Redis store on an auto-reconnecting connection
//! - [`token_cache`] - Typed token reads/writes that never surface store failures

pub mod cache_traits;
pub mod memory_store;
pub mod redis_store;
pub mod token_cache;

pub use cache_traits::{CacheResult, CacheStore};
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use token_cache::{decode_token, CachedToken, TokenCache};
