use crate::common::time::Sleeper;
use crate::probe::ProbeResult;
use std::time::Duration;
use tracing::debug;

/// Pause before retry number `attempt + 1`: 1s, 2s, 4s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(16))
}

/// Runs `attempt` up to `retries + 1` times, returning the first error-free
/// result or the last failure. Only the single-endpoint commands use this.
pub fn ping_with_retry<F>(retries: u32, sleeper: &dyn Sleeper, mut attempt: F) -> ProbeResult
where
    F: FnMut() -> ProbeResult,
{
    let mut n = 0;
    loop {
        let result = attempt();
        if result.is_ok() || n >= retries {
            return result;
        }
        let delay = backoff_delay(n);
        debug!(attempt = n + 1, ?delay, url = %result.url, "request failed, backing off");
        sleeper.sleep(delay);
        n += 1;
    }
}
