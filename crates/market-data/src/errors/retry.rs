/// Classification for retry policy.
///
/// Used by the retrying fetcher to decide whether a failed request should be
/// attempted again.
///
/// | Class | Retried? |
/// |-------|----------|
/// | `Never` | No, the error propagates immediately |
/// | `WithBackoff` | Yes, after `base * 2^attempt` until the retry bound |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad input or an undecodable answer.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Retry with exponential backoff.
    ///
    /// Used for network failures, timeouts and non-success HTTP statuses,
    /// including rate limiting (429).
    WithBackoff,
}
