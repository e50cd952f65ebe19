//! Backoff for transport calls that come back `RateLimited`.
//!
//! Page fetches, notices, pins and chart uploads all go through [`retry_rate_limited`]. Other errors
//! are returned on the first attempt.

use qmark_core::{QmarkError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Exponential backoff for `RateLimited` calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based); never shorter than the server's hint.
    pub fn delay_for(&self, attempt: u32, hint: Duration) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let backoff = self.initial_delay.saturating_mul(factor).min(self.max_delay);
        backoff.max(hint)
    }
}

/// Runs `op`, sleeping and retrying while it returns `RateLimited` and retries remain.
pub async fn retry_rate_limited<T, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Err(QmarkError::RateLimited { retry_after }) if attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt, retry_after);
                warn!(
                    what,
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Rate limited, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
