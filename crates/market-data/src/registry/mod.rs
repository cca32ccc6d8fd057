//! Source registry module.
//!
//! This module provides orchestration for token data providers, including:
//! - Fixed-window rate limiting per provider
//! - Retrying JSON fetch with exponential backoff
//! - Concurrent fan-out with per-source failure isolation
//! - Precedence-based merging of normalized records

mod diagnostics;
mod fetcher;
mod merge;
mod rate_limiter;
mod source_registry;

pub use diagnostics::{FetchDiagnostics, SourceAttempt, SourceOutcome};
pub use fetcher::{retry_with_backoff, JsonFetcher, RetryPolicy, RetryingFetcher};
pub use merge::{merge_records, MergePolicy};
pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use source_registry::SourceRegistry;
