use crate::common::time::{Clock, SystemClock};
use crate::probe::ProbeResult;
use std::collections::VecDeque;
use std::collections::vec_deque::Iter;
use std::time::SystemTime;

#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub timestamp: SystemTime,
    pub result: ProbeResult,
}

/// Fixed-capacity FIFO of the most recent probe results.
#[derive(Clone, Debug)]
pub struct BoundedHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl BoundedHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    pub fn add(&mut self, result: ProbeResult) {
        self.add_with_clock(result, &SystemClock);
    }

    pub fn add_with_clock(&mut self, result: ProbeResult, clock: &dyn Clock) {
        self.entries.push_back(HistoryEntry {
            timestamp: clock.now(),
            result,
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// The last `min(n, size)` entries, oldest first.
    pub fn get_recent(&self, n: usize) -> Iter<'_, HistoryEntry> {
        let start = self.entries.len().saturating_sub(n);
        self.entries.range(start..)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct FixedClock(SystemTime);

    impl Clock for FixedClock {
        fn now(&self) -> SystemTime {
            self.0
        }
    }

    fn result(status: u16, latency_ms: u64) -> ProbeResult {
        ProbeResult::response(
            "https://example.com",
            Duration::from_millis(latency_ms),
            status,
            format!("{status}"),
            -1,
            "HTTP/1.1",
        )
    }

    #[test]
    fn new_history_is_empty() {
        let history = BoundedHistory::new(10);
        assert_eq!(history.size(), 0);
        assert_eq!(history.capacity(), 10);
        assert!(history.is_empty());
        assert_eq!(history.get_recent(3).len(), 0);
    }

    #[test]
    fn add_records_entry() {
        let mut history = BoundedHistory::new(5);
        history.add(result(200, 100));
        assert_eq!(history.size(), 1);
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut history = BoundedHistory::new(3);
        for i in 1..=5 {
            history.add(result(200 + i, u64::from(i) * 100));
        }

        assert_eq!(history.size(), 3);
        let codes: Vec<u16> = history.get_recent(3).map(|e| e.result.status).collect();
        assert_eq!(codes, vec![203, 204, 205]);
    }

    #[test]
    fn get_recent_clamps_to_size() {
        let mut history = BoundedHistory::new(10);
        for i in 1..=5 {
            history.add(result(200, i * 100));
        }

        for (n, want) in [(3, 3), (5, 5), (10, 5), (0, 0)] {
            assert_eq!(history.get_recent(n).len(), want, "get_recent({n})");
        }
    }

    #[test]
    fn get_recent_is_oldest_first() {
        let mut history = BoundedHistory::new(10);
        for i in 1..=4 {
            history.add(result(200, i * 100));
        }

        let latencies: Vec<Duration> = history.get_recent(3).map(|e| e.result.latency).collect();
        assert_eq!(
            latencies,
            vec![
                Duration::from_millis(200),
                Duration::from_millis(300),
                Duration::from_millis(400),
            ]
        );
    }

    #[test]
    fn add_with_clock_stamps_entries() {
        let mut history = BoundedHistory::new(2);
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let t1 = t0 + Duration::from_secs(2);
        history.add_with_clock(result(200, 10), &FixedClock(t0));
        history.add_with_clock(result(200, 20), &FixedClock(t1));

        let stamps: Vec<SystemTime> = history.get_recent(2).map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![t0, t1]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut history = BoundedHistory::new(0);
        history.add(result(200, 10));
        assert_eq!(history.size(), 0);
    }
}
