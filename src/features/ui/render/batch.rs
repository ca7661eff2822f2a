use super::write_boxed_title;
use crate::batch::{BatchResult, BatchSummary, StopReason};
use crate::common::time::format_duration;
use crate::features::ui::format::{colored_latency, format_bytes, rate_color, rule, truncate_string};
use crossterm::style::Stylize;
use std::io::{self, Write};
use std::time::Duration;

const NAME_WIDTH: usize = 20;

pub fn write_batch_banner<W: Write>(out: &mut W, endpoints: usize, concurrency: usize) -> io::Result<()> {
    write_boxed_title(
        out,
        &[format!("Running batch: {endpoints} endpoints (concurrency: {concurrency})")],
    )?;
    writeln!(out, "Testing endpoints...")
}

pub fn write_batch_table<W: Write>(out: &mut W, summary: &BatchSummary) -> io::Result<()> {
    writeln!(
        out,
        "{:<20} {:<7} {:<7} {:<10} {:<10} RESULT",
        "ENDPOINT", "METHOD", "STATUS", "LATENCY", "SIZE"
    )?;
    writeln!(out, "{}", rule(75))?;

    for result in &summary.results {
        write_row(out, result)?;
    }

    writeln!(out, "\n{}", rule(75))?;
    writeln!(out, "Summary")?;
    writeln!(out, "   Total:        {} endpoints", summary.total)?;
    let rate = summary.success_rate();
    writeln!(
        out,
        "   Successful:   {} ({rate:.1}%)",
        summary.successful.to_string().with(rate_color(rate))
    )?;
    writeln!(out, "   Failed:       {}", summary.failed.to_string().red())?;
    if summary.slow > 0 {
        writeln!(out, "   Slow:         {} (> 500ms)", summary.slow.to_string().yellow())?;
    }
    if summary.total > 0 && !summary.avg_latency.is_zero() {
        writeln!(out, "   Avg Latency:  {}", colored_latency(summary.avg_latency))?;
    }
    writeln!(out, "   Total Time:   {}", format_duration(round_to_10ms(summary.total_time)))?;
    writeln!(out)?;

    if summary.failed == 0 {
        writeln!(out, "{}", "✓ All endpoints healthy!".green())
    } else {
        writeln!(out, "{}", format!("✗ {} endpoint(s) failed!", summary.failed).red())
    }
}

fn write_row<W: Write>(out: &mut W, result: &BatchResult) -> io::Result<()> {
    let transport_ok = result.probe.is_ok();
    let status = if transport_ok {
        result.probe.status.to_string()
    } else {
        "-".to_string()
    };
    let latency = if transport_ok {
        format_duration(result.latency())
    } else {
        "-".to_string()
    };
    let size = if result.probe.size_bytes > 0 {
        format_bytes(result.probe.size_bytes)
    } else {
        "-".to_string()
    };

    let verdict = if result.success && result.is_slow() {
        "⚠ SLOW".yellow().to_string()
    } else if result.success {
        "✓".green().to_string()
    } else {
        format!("✗ {}", result.message.as_deref().unwrap_or("failed"))
            .red()
            .to_string()
    };

    writeln!(
        out,
        "{:<20} {:<7} {:<7} {:<10} {:<10} {verdict}",
        truncate_string(&result.name, NAME_WIDTH),
        result.method.as_str(),
        status,
        latency,
        size,
    )
}

/// One stderr line per failure, printed as results arrive in quiet mode.
pub fn write_failure_line<W: Write>(out: &mut W, result: &BatchResult) -> io::Result<()> {
    let reason = match result.probe.error() {
        Some(err) => err.to_string(),
        None => format!(
            "Expected {}, got {}",
            result.expected_status, result.probe.status
        ),
    };
    writeln!(out, "{} {}: {reason}", "✗".red(), result.name)
}

/// Notice for runs that stopped before every endpoint was tested.
pub fn write_stop_notice<W: Write>(
    out: &mut W,
    summary: &BatchSummary,
    max_time: Option<Duration>,
) -> io::Result<()> {
    match summary.stop_reason {
        Some(StopReason::DeadlineExceeded) => {
            let limit = max_time.map(format_duration).unwrap_or_default();
            writeln!(
                out,
                "{} Batch exceeded max-time limit ({limit}); {} of {} endpoints not tested",
                "⏱".yellow(),
                summary.untested(),
                summary.planned
            )
        }
        Some(StopReason::FailFast) => writeln!(
            out,
            "{} Stopped after first failure (fail-fast); {} of {} endpoints not tested",
            "⚠".yellow(),
            summary.untested(),
            summary.planned
        ),
        None => Ok(()),
    }
}

fn round_to_10ms(duration: Duration) -> Duration {
    let tens = (duration.as_millis() + 5) / 10;
    Duration::from_millis(u64::try_from(tens * 10).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointSpec;
    use crate::probe::{ProbeErrorKind, ProbeResult};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    fn summary() -> BatchSummary {
        let mut summary = BatchSummary::new();
        let health = EndpointSpec::new("health", "https://api.example.com/health");
        summary.add_result(BatchResult::evaluate(
            &health,
            ProbeResult::response(health.url.as_str(), Duration::from_millis(40), 200, "200 OK", 2048, "HTTP/1.1"),
        ));
        let search = EndpointSpec::new("a-very-long-endpoint-name", "https://api.example.com/search");
        summary.add_result(BatchResult::evaluate(
            &search,
            ProbeResult::failed(search.url.as_str(), Duration::from_secs(10), ProbeErrorKind::Timeout, "operation timed out"),
        ));
        summary.planned = 4;
        summary.total_time = Duration::from_millis(1234);
        summary
    }

    #[test]
    fn table_lists_rows_and_summary() {
        let text = render(|out| write_batch_table(out, &summary()));
        assert!(text.contains("ENDPOINT"));
        assert!(text.contains("health"));
        assert!(text.contains("2.00 KB"));
        assert!(text.contains("a-very-long-endpo..."));
        assert!(text.contains("Error: operation timed out"));
        assert!(text.contains("Total:        2 endpoints"));
        assert!(text.contains("Total Time:   1.23s"));
        assert!(text.contains("1 endpoint(s) failed!"));
    }

    #[test]
    fn failure_line_names_endpoint() {
        let summary = summary();
        let text = render(|out| write_failure_line(out, &summary.results[1]));
        assert!(text.contains("a-very-long-endpoint-name: operation timed out"));
    }

    #[test]
    fn stop_notice_reports_untested_endpoints() {
        let mut summary = summary();
        assert_eq!(render(|out| write_stop_notice(out, &summary, None)), "");

        summary.stop_reason = Some(StopReason::DeadlineExceeded);
        let text = render(|out| write_stop_notice(out, &summary, Some(Duration::from_secs(30))));
        assert!(text.contains("max-time limit (30s); 2 of 4 endpoints not tested"));

        summary.stop_reason = Some(StopReason::FailFast);
        let text = render(|out| write_stop_notice(out, &summary, None));
        assert!(text.contains("fail-fast"));
    }
}
