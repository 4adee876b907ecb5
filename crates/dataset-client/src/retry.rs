//! Fixed-interval retry policy for 5xx responses.
//!
//! The client never retries by itself: [`RetryStrategy`] is installed in the
//! transport as a [`RetryTransientMiddleware`], which consults it after every
//! exchange. Once the retries are used up the last response is handed back
//! unchanged and mapped like any other status.

use reqwest::StatusCode;
use reqwest_middleware::{ClientWithMiddleware, Result as MiddlewareResult};
use reqwest_retry::{
    RetryDecision, RetryPolicy, RetryTransientMiddleware, Retryable, RetryableStrategy,
};
use std::time::{Duration, SystemTime};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default wait between attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(20);

/// Retries server errors a bounded number of times with a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryStrategy {
    max_retries: u32,
    retry_interval: Duration,
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL)
    }
}

impl RetryStrategy {
    /// Create a strategy allowing `max_retries` retries spaced `retry_interval` apart.
    pub fn new(max_retries: u32, retry_interval: Duration) -> Self {
        Self {
            max_retries,
            retry_interval,
        }
    }

    /// Maximum number of retries.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Decide whether a response should be re-requested.
    ///
    /// `attempt` counts executions so far, starting at 1. Statuses below 500
    /// are never retried.
    pub fn should_retry(&self, status: StatusCode, attempt: u32) -> bool {
        self.allows_attempt(attempt) && status.as_u16() >= 500
    }

    /// Delay before the next attempt. Constant, no backoff.
    pub fn retry_delay(&self) -> Duration {
        self.retry_interval
    }

    /// Wrap this strategy as transport middleware.
    pub fn into_middleware(self) -> RetryTransientMiddleware<RetryStrategy, RetryStrategy> {
        RetryTransientMiddleware::new_with_policy_and_strategy(self, self)
    }

    /// Build a transport that retries with this strategy around `client`.
    pub fn wrap(self, client: reqwest::Client) -> ClientWithMiddleware {
        reqwest_middleware::ClientBuilder::new(client)
            .with(self.into_middleware())
            .build()
    }

    fn allows_attempt(&self, attempt: u32) -> bool {
        attempt <= self.max_retries
    }
}

impl RetryableStrategy for RetryStrategy {
    fn handle(&self, res: &MiddlewareResult<reqwest::Response>) -> Option<Retryable> {
        match res {
            Ok(response) if response.status().as_u16() >= 500 => Some(Retryable::Transient),
            Ok(_) => None,
            // Connection-level failures surface to the caller untouched.
            Err(_) => Some(Retryable::Fatal),
        }
    }
}

impl RetryPolicy for RetryStrategy {
    fn should_retry(&self, _request_start_time: SystemTime, n_past_retries: u32) -> RetryDecision {
        // The middleware counts past retries from zero; executions start at one.
        if self.allows_attempt(n_past_retries.saturating_add(1)) {
            RetryDecision::Retry {
                execute_after: SystemTime::now() + self.retry_interval,
            }
        } else {
            RetryDecision::DoNotRetry
        }
    }
}
