//! Core error types for the dexfeed pipeline.
//!
//! Store-specific errors (Redis, in-memory) are converted to [`CacheError`]
//! by the store implementations so the pipeline stays backend-agnostic.

use dexfeed_market_data::MarketDataError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the pipeline.
///
/// Only [`Error::InvalidInput`] ever reaches a lookup caller: provider
/// failures are absorbed per source, and store failures degrade to a miss.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cache operation failed: {0}")]
    Cache(#[from] CacheError),

    #[error("Market data operation failed: {0}")]
    MarketData(MarketDataError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<MarketDataError> for Error {
    fn from(err: MarketDataError) -> Self {
        match err {
            MarketDataError::InvalidInput(message) => Self::InvalidInput(message),
            other => Self::MarketData(other),
        }
    }
}

/// Backend-agnostic error type for cache store operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The store could not be reached.
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),

    /// A store command failed.
    #[error("Cache command failed: {0}")]
    CommandFailed(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_dropped() || err.is_connection_refusal() || err.is_timeout() {
            Self::Unavailable(err.to_string())
        } else {
            Self::CommandFailed(err.to_string())
        }
    }
}
