use crate::core::config::PriceFeedConfig;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How many times a failed request is repeated, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy {
        retries: 0,
        delay: Duration::ZERO,
    };
}

impl From<&PriceFeedConfig> for RetryPolicy {
    fn from(config: &PriceFeedConfig) -> Self {
        RetryPolicy {
            retries: config.retries,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Client errors will not change on retry; everything else might.
fn is_retryable(err: &reqwest::Error) -> bool {
    !err.status().is_some_and(|s| s.is_client_error())
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// the policy's retries are exhausted. Returns the last error on failure.
pub async fn with_retry<F, Fut, T>(mut operation: F, policy: RetryPolicy) -> reqwest::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = reqwest::Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) if attempt < policy.retries && is_retryable(&err) => {
                attempt += 1;
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt, policy.retries, err
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
