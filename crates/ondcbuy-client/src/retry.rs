//! Bounded polling with exponential back-off for the confirmation fetch.
//!
//! The seller processes a select asynchronously, so the cart confirmation
//! may not exist yet when first requested. [`poll_with_backoff`] waits an
//! optional settle delay, then retries transient failures until the retry
//! budget or the deadline runs out, whichever comes first.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::ClientError;

/// Back-off delays never exceed this, whatever the base.
const MAX_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before the first attempt.
    pub settle_delay: Duration,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    pub backoff_base: Duration,
    /// Upper bound on total time spent after the settle delay.
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(1_000),
            max_retries: 5,
            backoff_base: Duration::from_millis(500),
            deadline: Duration::from_millis(15_000),
        }
    }
}

impl PollPolicy {
    #[must_use]
    pub fn from_config(config: &ondcbuy_core::AppConfig) -> Self {
        Self {
            settle_delay: Duration::from_millis(config.confirm_settle_delay_ms),
            max_retries: config.confirm_max_retries,
            backoff_base: Duration::from_millis(config.confirm_backoff_base_ms),
            deadline: Duration::from_millis(config.confirm_deadline_ms),
        }
    }

    /// No waiting at all; for tests and scripted runs.
    #[must_use]
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            settle_delay: Duration::ZERO,
            max_retries,
            backoff_base: Duration::ZERO,
            deadline: Duration::from_secs(60),
        }
    }
}

/// Returns `true` for confirmation failures worth polling again.
///
/// **Retriable:** transport failures, 404 (not created yet), 425, 429, any
/// 5xx, and a 200 with no items ([`ClientError::ConfirmationPending`]).
///
/// **Not retriable:** everything else, including other 4xx statuses and
/// malformed bodies.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Transport { .. } | ClientError::ConfirmationPending { .. } => true,
        ClientError::Status { status, .. } => {
            matches!(status, 404 | 425 | 429) || (500..600).contains(status)
        }
        _ => false,
    }
}

/// Runs `operation` until it succeeds, a non-retriable error occurs, the
/// retry budget is spent, or the next sleep would cross the deadline.
///
/// Returns the value together with the number of attempts made.
///
/// Back-off schedule: `backoff_base × 2^(attempt-1)` ± 25 % jitter, capped
/// at 10 s.
///
/// # Errors
///
/// Returns the last error observed when polling gives up.
pub async fn poll_with_backoff<T, F, Fut>(
    policy: &PollPolicy,
    mut operation: F,
) -> Result<(T, u32), ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    if !policy.settle_delay.is_zero() {
        tokio::time::sleep(policy.settle_delay).await;
    }

    let started = Instant::now();
    let base_ms = u64::try_from(policy.backoff_base.as_millis()).unwrap_or(u64::MAX);
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let err = match operation().await {
            Ok(value) => return Ok((value, attempt)),
            Err(err) => err,
        };

        if !is_retriable(&err) || attempt > policy.max_retries {
            return Err(err);
        }

        let computed = base_ms.saturating_mul(1u64 << (attempt - 1).min(20));
        let capped = computed.min(MAX_DELAY_MS);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
        let delay = Duration::from_millis(delay_ms);

        if started.elapsed() + delay > policy.deadline {
            tracing::warn!(
                attempt,
                elapsed_ms = started.elapsed().as_millis(),
                error = %err,
                "confirmation polling deadline reached"
            );
            return Err(err);
        }

        tracing::warn!(
            attempt,
            max_retries = policy.max_retries,
            delay_ms,
            error = %err,
            "confirmation not available, retrying after back-off"
        );
        tokio::time::sleep(delay).await;
    }
}
