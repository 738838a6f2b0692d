//! Retry policy for side-effect-free steps.
//!
//! Only errors that report [`DeployError::is_retryable`](crate::DeployError::is_retryable) are retried. Once a
//! transaction may have reached the chain, nothing is retried.

use std::future::Future;
use std::time::Duration;

use crate::config::DeploymentConfig;
use crate::deploy::types::DeployResult;
use crate::resilience::backoff::calculate_backoff;

/// How many times, and how patiently, to repeat a retryable step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    pub fn from_config(config: &DeploymentConfig) -> Self {
        Self {
            max_retries: config.submission_retries,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms)
    }

    /// Run `op`, retrying retryable failures up to `max_retries` times.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> DeployResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DeployResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        step = what,
                        error = %e,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::types::DeployError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 2,
        }
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: DeployResult<()> = RetryPolicy::default()
            .run("submit", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DeployError::Submission("rejected".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = fast(3)
            .run("submit", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(DeployError::Submission("busy".into()))
                } else {
                    Ok(7)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: DeployResult<()> = fast(2)
            .run("submit", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DeployError::Submission("down".into()))
            })
            .await;
        assert!(matches!(result, Err(DeployError::Submission(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_fast() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: DeployResult<()> = fast(5)
            .run("prepare", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DeployError::Signing("bad key".into()))
            })
            .await;
        assert!(!result.as_ref().unwrap_err().is_retryable());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
