mod client;
mod helpers;
mod retry;

pub use client::ProbeClient;
pub use retry::{backoff_delay, ping_with_retry};

use crate::config::{EndpointSpec, Headers, HttpMethod};
use crate::probe::{ProbeErrorKind, ProbeResult};
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Clone, Debug)]
pub struct ProbeRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl ProbeRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
            timeout,
        }
    }

    pub fn for_endpoint(endpoint: &EndpointSpec, timeout: Duration) -> Self {
        Self {
            url: endpoint.url.clone(),
            method: endpoint.method,
            headers: endpoint.headers.clone(),
            body: endpoint.body.clone(),
            timeout,
        }
    }
}

/// Probes one endpoint with the given per-request timeout. Shared by every
/// batch worker, so implementations must be callable from many threads.
pub trait EndpointProbe: Send + Sync {
    fn probe(&self, endpoint: &EndpointSpec, timeout: Duration) -> ProbeResult;
}

impl<F> EndpointProbe for F
where
    F: Fn(&EndpointSpec, Duration) -> ProbeResult + Send + Sync,
{
    fn probe(&self, endpoint: &EndpointSpec, timeout: Duration) -> ProbeResult {
        self(endpoint, timeout)
    }
}

/// libcurl-backed probe; each call gets its own handle.
#[derive(Clone, Copy, Debug, Default)]
pub struct CurlProbe;

impl EndpointProbe for CurlProbe {
    fn probe(&self, endpoint: &EndpointSpec, timeout: Duration) -> ProbeResult {
        let started = Instant::now();
        match ProbeClient::new() {
            Ok(mut client) => client.ping(&ProbeRequest::for_endpoint(endpoint, timeout)),
            Err(err) => {
                warn!(endpoint = %endpoint.name, "probe client init failed: {err}");
                ProbeResult::failed(
                    endpoint.url.as_str(),
                    started.elapsed(),
                    ProbeErrorKind::Io,
                    format!("probe client init failed: {err}"),
                )
            }
        }
    }
}
