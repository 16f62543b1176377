//! Retry policy shared by both vendor clients.
//!
//! A request is retried when the response status is in the configured set or
//! when the transport fails to connect or times out. Delays grow
//! exponentially from `base_delay` with no jitter.

use crate::error::{Result, SdkError};
use std::time::Duration;
use tracing::{error, warn};

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 200;
const DEFAULT_RETRY_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Configuration for retry behavior.
///
/// # Example
///
/// ```rust
/// use esign_openim::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default()
///     .with_max_retries(5)
///     .with_base_delay(Duration::from_millis(50));
///
/// assert_eq!(policy.delay_for(1), Duration::from_millis(50));
/// assert_eq!(policy.delay_for(3), Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts per call, the first one included.
    pub max_retries: u32,
    /// Response status codes that trigger another attempt.
    pub retry_status_codes: Vec<u16>,
    /// Delay before the second attempt; doubles for each later one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_status_codes: DEFAULT_RETRY_STATUS_CODES.to_vec(),
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// A policy that sends every request exactly once.
    pub fn none() -> Self {
        Self {
            max_retries: 1,
            ..Self::default()
        }
    }

    /// Set the attempt ceiling.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Replace the retryable status-code set.
    pub fn with_retry_status_codes(mut self, codes: impl Into<Vec<u16>>) -> Self {
        self.retry_status_codes = codes.into();
        self
    }

    /// Set the base delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    /// Whether a response with this status should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_status_codes.contains(&status)
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Send a request until it succeeds, is not retryable, or the attempt
    /// ceiling is reached.
    ///
    /// `build` is called once per attempt so that time-dependent headers are
    /// produced fresh. The last response is returned as-is even when its
    /// status is retryable; the caller decides how to report it.
    pub(crate) async fn execute<F>(
        &self,
        operation_id: &str,
        mut build: F,
    ) -> Result<reqwest::Response>
    where
        F: FnMut() -> Result<reqwest::RequestBuilder>,
    {
        let attempts = self.attempts();
        let mut attempt = 1;

        loop {
            match build()?.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if attempt < attempts && self.should_retry_status(status) {
                        let delay = self.delay_for(attempt);
                        warn!(
                            operation_id,
                            attempt,
                            status,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying after retryable status"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if attempt < attempts && is_retryable_transport(&e) {
                        let delay = self.delay_for(attempt);
                        warn!(
                            operation_id,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Retrying after transport failure"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    error!(operation_id, attempt, error = %e, "HTTP request failed");
                    return Err(SdkError::Network(e));
                }
            }
        }
    }
}

fn is_retryable_transport(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}
