//! Whole-operation retry with a fixed backoff schedule.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

/// How often, and after which delays, an idempotent operation is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before each retry; the first attempt is immediate
    pub backoff: Vec<Duration>,
}

impl RetryPolicy {
    pub fn from_secs(delays: &[u64]) -> Self {
        RetryPolicy {
            backoff: delays.iter().copied().map(Duration::from_secs).collect(),
        }
    }

    /// A single attempt with no retries.
    pub fn none() -> Self {
        RetryPolicy {
            backoff: Vec::new(),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.backoff.len() + 1
    }
}

impl Default for RetryPolicy {
    /// Three attempts: immediately, after 2s, after another 5s
    fn default() -> Self {
        RetryPolicy::from_secs(&[2, 5])
    }
}

/// Run `f` until it succeeds, fails with a non-retryable error, or the
/// policy runs out of attempts. The last error is returned unchanged.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    is_retryable: impl Fn(&E) -> bool,
    mut f: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut delays = policy.backoff.iter();
    let mut attempt = 1;

    loop {
        match f().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(operation, attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if !is_retryable(&err) {
                    return Err(err);
                }

                let Some(delay) = delays.next() else {
                    warn!(operation, attempt, error = %err, "Giving up after final attempt");
                    return Err(err);
                };

                warn!(
                    operation,
                    attempt,
                    delay_secs = delay.as_secs_f64(),
                    error = %err,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(*delay).await;
                attempt += 1;
            }
        }
    }
}
