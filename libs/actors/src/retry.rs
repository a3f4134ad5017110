//! `retry-with-backoff`: exponential backoff with a cap and a bounded
//! attempt count, stopping on first success or exhaustion.

use mano_config::RetryPolicy;
use mano_types::Result;
use std::future::Future;
use std::time::Duration;

pub async fn retry_with_backoff<F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut delay = policy.initial_delay;

    for attempt in 1..=policy.max_attempts {
        match op().await {
            Ok(()) => return Ok(()),
            Err(err) if attempt == policy.max_attempts => return Err(err),
            Err(err) => {
                tracing::debug!(attempt, max_attempts = policy.max_attempts, %err, "retrying after backoff");
                tokio::time::sleep(delay).await;
                delay = scale(delay, policy.backoff_factor, policy.max_delay);
            }
        }
    }

    unreachable!("loop always returns by the final attempt")
}

fn scale(delay: Duration, factor: f64, cap: Duration) -> Duration {
    let scaled = delay.mul_f64(factor);
    scaled.min(cap)
}
