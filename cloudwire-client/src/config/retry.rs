//! Retry policy and the async retry loop for service calls.
//!
//! The delay before retry `n` (0-based) is drawn under a ceiling of
//! `base * 2^n`, capped at [`RetryPolicy::max_backoff`]. Throttled calls
//! start from [`RetryPolicy::throttled_base_delay`] and wait at least half
//! the ceiling. Other transient failures draw from `0..=ceiling`.
//!
//! Only errors for which [`ClientError::is_retryable`] holds are retried.
//! Marshalling, parse and client-side service errors return immediately.
//!
//! # Example
//!
//! ```ignore
//! use cloudwire_client::{ClientConfiguration, dynamodb, retry};
//!
//! let config = ClientConfiguration::new().max_error_retry(5);
//!
//! let table = retry(&config, Some(&dynamodb::retry_policy()), || async {
//!     let response = transport.send(DescribeTableMarshaller.marshall(&input)?.into_http_request(endpoint)?).await?;
//!     dynamodb::handle(&DescribeTableResultUnmarshaller, response)
//! }).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use super::ClientConfiguration;
use crate::ClientError;

/// Default retry values.
pub mod defaults {
    use std::time::Duration;

    /// Backoff base for transient, non-throttling failures.
    pub const BASE_DELAY: Duration = Duration::from_millis(100);

    /// Backoff base once the service has throttled the caller.
    pub const THROTTLED_BASE_DELAY: Duration = Duration::from_millis(500);

    /// Upper bound on any single delay.
    pub const MAX_BACKOFF: Duration = Duration::from_secs(20);

    /// Retries after the first attempt.
    pub const MAX_RETRIES: u32 = 3;

    /// DynamoDB recovers from transient failures quickly.
    pub const DYNAMODB_BASE_DELAY: Duration = Duration::from_millis(25);

    /// Retries after the first DynamoDB attempt.
    pub const DYNAMODB_MAX_RETRIES: u32 = 10;
}

/// When and how long to wait before retrying a failed call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Backoff base for retryable, non-throttling errors.
    pub base_delay: Duration,
    /// Backoff base for throttling errors.
    pub throttled_base_delay: Duration,
    /// Cap on each delay.
    pub max_backoff: Duration,
    /// Retries after the first attempt. Zero disables retries.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: defaults::BASE_DELAY,
            throttled_base_delay: defaults::THROTTLED_BASE_DELAY,
            max_backoff: defaults::MAX_BACKOFF,
            max_retries: defaults::MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    /// The SDK default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// DynamoDB: 25ms base, up to 10 retries.
    pub fn dynamodb() -> Self {
        Self {
            base_delay: defaults::DYNAMODB_BASE_DELAY,
            max_retries: defaults::DYNAMODB_MAX_RETRIES,
            ..Default::default()
        }
    }

    /// Set the number of retries after the first attempt.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the backoff base for non-throttling errors.
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the backoff base for throttling errors.
    pub fn throttled_base_delay(mut self, delay: Duration) -> Self {
        self.throttled_base_delay = delay;
        self
    }

    /// Set the cap on each delay.
    pub fn max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }

    /// Whether `error` should be retried after `retries_attempted` retries.
    pub fn should_retry(&self, error: &ClientError, retries_attempted: u32) -> bool {
        retries_attempted < self.max_retries && error.is_retryable()
    }

    /// Largest delay allowed before retry number `retries_attempted`.
    pub fn backoff_ceiling(&self, throttled: bool, retries_attempted: u32) -> Duration {
        let base = if throttled {
            self.throttled_base_delay
        } else {
            self.base_delay
        };
        // 2^30 already saturates any sensible base against the cap
        let factor = 1u32 << retries_attempted.min(30);
        base.saturating_mul(factor).min(self.max_backoff)
    }

    /// Randomized delay before retry number `retries_attempted` of `error`.
    pub fn delay_before_retry(&self, error: &ClientError, retries_attempted: u32) -> Duration {
        let throttled = error.is_throttling();
        let ceiling = self.backoff_ceiling(throttled, retries_attempted).as_millis() as u64;
        let millis = if throttled {
            let half = ceiling / 2;
            half + rand::random_range(0..=ceiling - half)
        } else {
            rand::random_range(0..=ceiling)
        };
        Duration::from_millis(millis)
    }
}

/// Retry `f` under the policy `config` resolves for a service.
///
/// See [`ClientConfiguration::retry_policy_for`].
pub async fn retry<F, Fut, T>(
    config: &ClientConfiguration,
    service_default: Option<&RetryPolicy>,
    f: F,
) -> Result<T, ClientError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    retry_with_policy(&config.retry_policy_for(service_default), f).await
}

/// Retry `f` under `policy`.
pub async fn retry_with_policy<F, Fut, T>(policy: &RetryPolicy, f: F) -> Result<T, ClientError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut retries_attempted = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if policy.should_retry(&e, retries_attempted) => {
                let delay = policy.delay_before_retry(&e, retries_attempted);
                retries_attempted += 1;
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    error = %e,
                    code = e.code(),
                    throttled = e.is_throttling(),
                    retry = retries_attempted,
                    delay_ms = delay.as_millis() as u64,
                    "retrying service call"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
