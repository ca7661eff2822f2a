mod orchestrator;
mod summary;

pub use orchestrator::{run_batch, run_batch_with};
pub use summary::BatchSummary;

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT, EndpointSpec, HttpMethod, SLOW_THRESHOLD};
use crate::probe::ProbeResult;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum BatchError {
    #[error("batch has no endpoints")]
    NoEndpoints,
    #[error("concurrency must be at least 1 (got {value})")]
    InvalidConcurrency { value: usize },
}

/// Why a batch stopped admitting endpoints before walking the whole list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopReason {
    FailFast,
    DeadlineExceeded,
}

#[derive(Clone, Debug)]
pub struct BatchOptions {
    pub concurrency: usize,
    pub max_time: Option<Duration>,
    pub fail_fast: bool,
    /// Applied to endpoints without their own timeout.
    pub default_timeout: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_time: None,
            fail_fast: false,
            default_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// One endpoint's verdict within a batch run.
#[derive(Clone, Debug)]
pub struct BatchResult {
    pub name: String,
    pub url: String,
    pub method: HttpMethod,
    pub expected_status: u16,
    pub probe: ProbeResult,
    pub success: bool,
    pub message: Option<String>,
}

impl BatchResult {
    /// Success requires an error-free probe whose status matches the
    /// expectation. Transport errors skip the status comparison.
    pub fn evaluate(endpoint: &EndpointSpec, probe: ProbeResult) -> Self {
        let (success, message) = match probe.error() {
            Some(err) => (false, Some(format!("Error: {err}"))),
            None if probe.status != endpoint.expected_status => (
                false,
                Some(format!(
                    "Expected {}, got {}",
                    endpoint.expected_status, probe.status
                )),
            ),
            None => (true, None),
        };

        Self {
            name: endpoint.name.clone(),
            url: endpoint.url.clone(),
            method: endpoint.method,
            expected_status: endpoint.expected_status,
            probe,
            success,
            message,
        }
    }

    pub fn latency(&self) -> Duration {
        self.probe.latency
    }

    pub fn is_slow(&self) -> bool {
        self.probe.is_ok() && self.probe.latency > SLOW_THRESHOLD
    }

    /// Failure text for reports: the transport message, else the mismatch.
    pub fn failure_text(&self) -> Option<String> {
        if self.success {
            return None;
        }
        match self.probe.error() {
            Some(err) => Some(err.to_string()),
            None => self.message.clone(),
        }
    }
}
