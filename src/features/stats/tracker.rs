use std::time::Duration;

/// Streaming statistics for one endpoint under continuous monitoring.
///
/// Counts and min/max are maintained on every [`record`](Self::record);
/// average, percentiles and standard deviation are recomputed from the full
/// latency history on each query.
#[derive(Clone, Debug, Default)]
pub struct RollingTracker {
    total: u64,
    successful: u64,
    failed: u64,
    latencies: Vec<Duration>,
    min: Option<Duration>,
    max: Option<Duration>,
}

impl RollingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, latency: Duration, success: bool) {
        self.total += 1;
        if success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.latencies.push(latency);

        // First sample seeds both bounds; a zero latency is a real minimum.
        self.min = Some(self.min.map_or(latency, |min| min.min(latency)));
        self.max = Some(self.max.map_or(latency, |max| max.max(latency)));
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn successful(&self) -> u64 {
        self.successful
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Latencies in request order.
    pub fn latencies(&self) -> &[Duration] {
        &self.latencies
    }

    pub fn min_latency(&self) -> Option<Duration> {
        self.min
    }

    pub fn max_latency(&self) -> Option<Duration> {
        self.max
    }

    pub fn avg_latency(&self) -> Duration {
        if self.latencies.is_empty() {
            return Duration::ZERO;
        }
        let sum: u128 = self.latencies.iter().map(Duration::as_nanos).sum();
        nanos_to_duration(sum / self.latencies.len() as u128)
    }

    /// Nearest-rank percentile, `p` in `[0, 1]`: index `floor(n * p) - 1`
    /// clamped to the sample range. No interpolation.
    pub fn percentile(&self, p: f64) -> Duration {
        if self.latencies.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();

        let n = sorted.len();
        let rank = (n as f64 * p).floor() as i64 - 1;
        let index = rank.clamp(0, n as i64 - 1) as usize;
        sorted[index]
    }

    /// Population standard deviation over every recorded latency.
    pub fn std_dev(&self) -> Duration {
        if self.latencies.is_empty() {
            return Duration::ZERO;
        }
        let n = self.latencies.len() as f64;
        let mean = self.latencies.iter().map(Duration::as_secs_f64).sum::<f64>() / n;
        let variance = self
            .latencies
            .iter()
            .map(|latency| {
                let diff = latency.as_secs_f64() - mean;
                diff * diff
            })
            .sum::<f64>()
            / n;
        Duration::from_secs_f64(variance.sqrt())
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.successful as f64 / self.total as f64 * 100.0
    }
}

fn nanos_to_duration(nanos: u128) -> Duration {
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
