use super::{BatchResult, StopReason};
use std::time::Duration;

/// Running aggregate of a batch run. Mutated by a single collector.
#[derive(Clone, Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub slow: usize,
    pub avg_latency: Duration,
    /// Arrival order, not input order.
    pub results: Vec<BatchResult>,
    pub total_time: Duration,
    /// Endpoints handed to the run, tested or not.
    pub planned: usize,
    pub stop_reason: Option<StopReason>,
    latency_samples: u64,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: BatchResult) {
        self.total += 1;
        if result.success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        if result.is_slow() {
            self.slow += 1;
        }

        // failed transports (timeouts especially) would skew the mean
        if result.probe.is_ok() {
            self.latency_samples += 1;
            let n = u128::from(self.latency_samples);
            let avg = self.avg_latency.as_nanos();
            let next = (avg * (n - 1) + result.latency().as_nanos()) / n;
            self.avg_latency = Duration::from_nanos(u64::try_from(next).unwrap_or(u64::MAX));
        }

        self.results.push(result);
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.successful as f64 / self.total as f64 * 100.0
    }

    /// Endpoints that never got a result, because the run stopped early.
    pub fn untested(&self) -> usize {
        self.planned.saturating_sub(self.total)
    }

    pub fn deadline_exceeded(&self) -> bool {
        self.stop_reason == Some(StopReason::DeadlineExceeded)
    }
}

#[cfg(test)]
mod tests;
