use crate::batch::{BatchResult, BatchSummary};
use serde::{Deserialize, Serialize};

/// Machine-readable batch outcome, shared by the JSON and CSV renderers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub slow: usize,
    pub success_rate: f64,
    pub avg_latency_ms: u64,
    pub total_time_ms: u64,
    pub results: Vec<ReportEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub url: String,
    pub method: String,
    pub status: u16,
    pub expected_status: u16,
    pub latency_ms: u64,
    pub size_bytes: i64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&BatchResult> for ReportEntry {
    fn from(result: &BatchResult) -> Self {
        Self {
            name: result.name.clone(),
            url: result.url.clone(),
            method: result.method.to_string(),
            status: result.probe.status,
            expected_status: result.expected_status,
            latency_ms: millis(result.latency()),
            size_bytes: result.probe.size_bytes,
            success: result.success,
            error: result.failure_text(),
        }
    }
}

impl From<&BatchSummary> for BatchReport {
    fn from(summary: &BatchSummary) -> Self {
        Self {
            total: summary.total,
            successful: summary.successful,
            failed: summary.failed,
            slow: summary.slow,
            success_rate: summary.success_rate(),
            avg_latency_ms: millis(summary.avg_latency),
            total_time_ms: millis(summary.total_time),
            results: summary.results.iter().map(ReportEntry::from).collect(),
        }
    }
}

impl BatchReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
