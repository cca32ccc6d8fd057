//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all provider operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while talking to a token data provider.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which the [`RetryingFetcher`](crate::registry::RetryingFetcher) uses to decide
/// whether another attempt is worthwhile.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The caller passed a blank or malformed token address.
    /// This is a terminal error - retrying won't help.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The provider could not be reached or kept failing after every retry.
    #[error("Provider unavailable: {provider} - {message}")]
    ProviderUnavailable {
        /// The provider that failed
        provider: String,
        /// What went wrong
        message: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {provider}")]
    HttpStatus {
        /// The provider that answered
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered, but the body was not the JSON we expected.
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        /// The provider that answered
        provider: String,
        /// Description of the decoding failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::Never`]: Don't retry, the error is terminal
    /// - [`RetryClass::WithBackoff`]: Retry with exponential backoff
    ///
    /// # Examples
    ///
    /// ```
    /// use dexfeed_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "dexscreener".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::InvalidInput("".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Terminal errors - never retry
            Self::InvalidInput(_)
            | Self::InvalidResponse { .. }
            | Self::ProviderUnavailable { .. } => RetryClass::Never,

            // Transport and status failures - retry with backoff
            Self::RateLimited { .. }
            | Self::HttpStatus { .. }
            | Self::Timeout { .. }
            | Self::Network(_) => RetryClass::WithBackoff,
        }
    }

    /// Wraps an exhausted error into [`MarketDataError::ProviderUnavailable`].
    ///
    /// Already-terminal errors are returned unchanged.
    pub fn into_unavailable(self, provider: &str) -> Self {
        match self {
            Self::InvalidInput(_) | Self::ProviderUnavailable { .. } => self,
            other => Self::ProviderUnavailable {
                provider: provider.to_string(),
                message: other.to_string(),
            },
        }
    }
}
