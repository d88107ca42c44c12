//! Retrying transient upstream failures.
//!
//! Only the vision call retries. Image search has its own recovery path in
//! the provider fallback.

use crate::error::UpstreamError;
use std::time::Duration;

const MAX_BACKOFF_MS: u64 = 30_000;

/// How many times to retry, and how long to wait in between.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub attempts: u32,
    /// Delay before the first retry; doubles on each further retry
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    /// Whether a failure after `retries_done` retries should be retried.
    pub fn should_retry(&self, retries_done: u32, error: &UpstreamError) -> bool {
        retries_done < self.attempts && is_retryable(error)
    }

    /// Wait before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        backoff_duration(retry.saturating_sub(1), self.base_delay_ms)
    }
}

/// Transient: timeouts, 429 and 5xx. Auth failures, other 4xx and
/// unparseable replies are final.
pub fn is_retryable(error: &UpstreamError) -> bool {
    let (status_code, message) = match error {
        UpstreamError::Timeout { .. } => return true,
        UpstreamError::Llm {
            status_code,
            message,
        } => (status_code, message),
        UpstreamError::Search {
            status_code,
            message,
            ..
        } => (status_code, message),
    };
    match status_code {
        Some(code) => *code == 429 || (500..=599).contains(code),
        // No status: transport failure such as a refused connection
        None => message.contains("timed out") || message.contains("connect"),
    }
}

/// `base_delay_ms * 2^attempt`, capped at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(MAX_BACKOFF_MS))
}
