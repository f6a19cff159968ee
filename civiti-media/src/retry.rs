use std::future::Future;
use tracing::{debug, warn};

use crate::{MediaResult, RetryPolicy};

/// Run `op` until it succeeds or the policy is exhausted, sleeping
/// `policy.delay_for(n)` before retry `n`. Returns the last error.
///
/// `op` receives the 0-based attempt index.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, operation: &str, mut op: F) -> MediaResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = MediaResult<T>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 0;
    loop {
        if attempt > 0 {
            let delay = policy.delay_for(attempt);
            debug!(operation, attempt = attempt + 1, ?delay, "backing off before retry");
            tokio::time::sleep(delay).await;
        }

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(
                    operation,
                    "attempt {}/{} failed: {}",
                    attempt + 1,
                    max_attempts,
                    e
                );
                if attempt >= policy.max_retries {
                    return Err(e);
                }
                attempt += 1;
            }
        }
    }
}
