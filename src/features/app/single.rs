use super::{AppError, OutputMode, Outcome, build_request};
use crate::common::time::ThreadSleeper;
use crate::data_model::settings::{PingSettings, RequestSettings};
use crate::probe_engine::{ProbeClient, ping_with_retry};
use crate::ui::{
    write_ping_failure, write_ping_success, write_request_details, write_trace,
    write_trace_banner, write_trace_failure,
};
use std::io::{self, Write};
use tracing::debug;

pub fn run_ping(settings: &PingSettings, mode: OutputMode) -> Result<Outcome, AppError> {
    let request = build_request(&settings.request)?;
    let mut client = ProbeClient::new()?;
    let mut out = io::stdout().lock();

    if mode.verbose && mode.chatty() {
        write_request_details(&mut out, &request, settings.retries)?;
    }

    let result = ping_with_retry(settings.retries, &ThreadSleeper, || client.ping(&request));
    debug!(status = result.status, latency = ?result.latency, "ping finished");

    if result.is_ok() {
        if mode.chatty() {
            write_ping_success(&mut out, &result)?;
        }
        Ok(Outcome::Healthy)
    } else {
        if mode.errors() {
            write_ping_failure(&mut out, &result)?;
        }
        Ok(Outcome::Unhealthy)
    }
}

pub fn run_trace(settings: &RequestSettings, mode: OutputMode) -> Result<Outcome, AppError> {
    let request = build_request(settings)?;
    let mut client = ProbeClient::new()?;
    let mut out = io::stdout().lock();

    if mode.chatty() {
        write_trace_banner(&mut out, &request.url)?;
        if mode.verbose {
            write_request_details(&mut out, &request, 0)?;
        }
        out.flush()?;
    }

    let trace = client.trace(&request);
    if trace.error().is_some() {
        if mode.errors() {
            write_trace_failure(&mut out, &trace)?;
        }
        return Ok(Outcome::Unhealthy);
    }

    if mode.chatty() {
        write_trace(&mut out, &trace)?;
    }
    Ok(Outcome::Healthy)
}
