use super::BatchSummary;
use crate::batch::{BatchResult, StopReason};
use crate::config::EndpointSpec;
use crate::probe::{ProbeErrorKind, ProbeResult};
use std::time::Duration;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn ok_result(name: &str, latency_ms: u64) -> BatchResult {
    let spec = EndpointSpec::new(name, format!("https://api.example.com/{name}"));
    let probe = ProbeResult::response(
        spec.url.as_str(),
        ms(latency_ms),
        200,
        "200 OK",
        64,
        "HTTP/1.1",
    );
    BatchResult::evaluate(&spec, probe)
}

fn mismatch_result(name: &str, status: u16, latency_ms: u64) -> BatchResult {
    let spec = EndpointSpec::new(name, format!("https://api.example.com/{name}"));
    let probe = ProbeResult::response(
        spec.url.as_str(),
        ms(latency_ms),
        status,
        status.to_string(),
        64,
        "HTTP/1.1",
    );
    BatchResult::evaluate(&spec, probe)
}

fn error_result(name: &str, latency_ms: u64) -> BatchResult {
    let spec = EndpointSpec::new(name, format!("https://api.example.com/{name}"));
    let probe = ProbeResult::failed(
        spec.url.as_str(),
        ms(latency_ms),
        ProbeErrorKind::Connect,
        "connection refused",
    );
    BatchResult::evaluate(&spec, probe)
}

#[test]
fn new_summary_is_empty() {
    let summary = BatchSummary::new();
    assert_eq!(summary.total, 0);
    assert_eq!(summary.avg_latency, Duration::ZERO);
    assert!(summary.results.is_empty());
    assert_eq!(summary.success_rate(), 0.0);
    assert_eq!(summary.stop_reason, None);
}

#[test]
fn running_average_ignores_failed_transports() {
    let mut summary = BatchSummary::new();

    summary.add_result(ok_result("a", 100));
    assert_eq!(summary.avg_latency, ms(100));

    summary.add_result(ok_result("b", 200));
    assert_eq!(summary.avg_latency, ms(150));

    summary.add_result(error_result("c", 10_000));
    assert_eq!(summary.avg_latency, ms(150));
    assert_eq!(summary.total, 3);
    assert_eq!(summary.failed, 1);

    summary.add_result(ok_result("d", 300));
    assert_eq!(summary.avg_latency, ms(200));
    assert_eq!(summary.total, 4);
    assert_eq!(summary.successful, 3);
}

#[test]
fn status_mismatch_counts_as_failure_but_keeps_latency() {
    let mut summary = BatchSummary::new();
    summary.add_result(ok_result("a", 100));
    summary.add_result(mismatch_result("b", 503, 300));

    assert_eq!(summary.successful, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.avg_latency, ms(200));
}

#[test]
fn totals_stay_consistent() {
    let mut summary = BatchSummary::new();
    summary.add_result(ok_result("a", 50));
    summary.add_result(ok_result("b", 700));
    summary.add_result(error_result("c", 900));
    summary.add_result(mismatch_result("d", 404, 600));

    assert_eq!(summary.total, summary.successful + summary.failed);
    assert_eq!(summary.results.len(), summary.total);
    assert_eq!(summary.slow, 2);
    assert!(summary.slow <= summary.total);
    assert_eq!(summary.success_rate(), 50.0);
}

#[test]
fn results_keep_arrival_order() {
    let mut summary = BatchSummary::new();
    for name in ["c", "a", "b"] {
        summary.add_result(ok_result(name, 10));
    }
    let names: Vec<&str> = summary.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn untested_counts_missing_endpoints() {
    let mut summary = BatchSummary::new();
    summary.planned = 5;
    summary.add_result(ok_result("a", 10));
    summary.add_result(ok_result("b", 10));
    summary.stop_reason = Some(StopReason::DeadlineExceeded);

    assert_eq!(summary.untested(), 3);
    assert!(summary.deadline_exceeded());
}
