use super::tracker::RollingTracker;
use crate::common::time::format_duration;
use crate::config::{FAST_THRESHOLD, SLOW_THRESHOLD};
use crate::probe::TraceResult;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tone {
    Good,
    Notable,
    Warning,
    Critical,
    Neutral,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Insight {
    pub tone: Tone,
    pub text: String,
}

impl Insight {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LatencyClass {
    Fast,
    Moderate,
    Slow,
}

pub fn latency_class(latency: Duration) -> LatencyClass {
    if latency < FAST_THRESHOLD {
        LatencyClass::Fast
    } else if latency < SLOW_THRESHOLD {
        LatencyClass::Moderate
    } else {
        LatencyClass::Slow
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Consistency {
    VeryConsistent,
    ModerateVariance,
    HighVariance,
}

impl Consistency {
    pub fn from_std_dev(std_dev: Duration) -> Self {
        if std_dev < Duration::from_millis(50) {
            Consistency::VeryConsistent
        } else if std_dev < Duration::from_millis(200) {
            Consistency::ModerateVariance
        } else {
            Consistency::HighVariance
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Consistency::VeryConsistent => "very consistent",
            Consistency::ModerateVariance => "moderate variance",
            Consistency::HighVariance => "high variance",
        }
    }
}

/// Observations for the end-of-session watch summary.
pub fn watch_insights(
    tracker: &RollingTracker,
    elapsed: Duration,
    request_count: u64,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if tracker.total() > 0 && tracker.failed() == 0 {
        insights.push(Insight::new(
            Tone::Good,
            "Perfect reliability - no failures detected",
        ));
    } else if tracker.failed() > 0 {
        let failure_rate = tracker.failed() as f64 / tracker.total() as f64 * 100.0;
        insights.push(Insight::new(
            Tone::Critical,
            format!("{failure_rate:.1}% failure rate - investigate error patterns"),
        ));
    }

    if tracker.total() > 0 {
        let avg = tracker.avg_latency();
        let (tone, text) = if avg < Duration::from_millis(50) {
            (Tone::Notable, "Exceptional response times (< 50ms average)")
        } else if avg < FAST_THRESHOLD {
            (Tone::Good, "Fast response times (< 200ms average)")
        } else if avg < SLOW_THRESHOLD {
            (Tone::Warning, "Moderate response times (200-500ms average)")
        } else if avg < Duration::from_secs(1) {
            (Tone::Warning, "Slow response times (500ms-1s average)")
        } else {
            (Tone::Critical, "Very slow response times (> 1s average)")
        };
        insights.push(Insight::new(tone, text));

        if !avg.is_zero() {
            let ratio = tracker.std_dev().as_secs_f64() / avg.as_secs_f64();
            if ratio < 0.2 {
                insights.push(Insight::new(
                    Tone::Good,
                    "Highly consistent performance (low variance)",
                ));
            } else if ratio > 0.5 {
                insights.push(Insight::new(
                    Tone::Warning,
                    "Inconsistent performance (high variance)",
                ));
            }
        }

        if let (Some(min), Some(max)) = (tracker.min_latency(), tracker.max_latency())
            && max - min > Duration::from_secs(1)
        {
            insights.push(Insight::new(
                Tone::Warning,
                format!(
                    "Large latency spread: {} (min) to {} (max)",
                    format_duration(min),
                    format_duration(max)
                ),
            ));
        }

        if !elapsed.is_zero() {
            let per_sec = request_count as f64 / elapsed.as_secs_f64();
            insights.push(Insight::new(
                Tone::Neutral,
                format!("Throughput: {per_sec:.2} requests/second"),
            ));
        }
    }

    if elapsed > Duration::from_secs(5 * 60) {
        insights.push(Insight::new(
            Tone::Neutral,
            format!(
                "Long monitoring session: {}",
                format_duration(Duration::from_secs(elapsed.as_secs()))
            ),
        ));
    }

    insights
}

/// Observations about where a traced request spent its time.
pub fn trace_insights(trace: &TraceResult) -> Vec<Insight> {
    let mut insights = Vec::new();
    let ms = Duration::from_millis;

    if !trace.dns.is_zero() {
        if trace.dns < ms(10) {
            insights.push(Insight::new(Tone::Good, "Fast DNS lookup (likely cached)"));
        } else if trace.dns > ms(100) {
            insights.push(Insight::new(
                Tone::Warning,
                format!(
                    "Slow DNS lookup ({}, {:.1}% of total)",
                    format_duration(trace.dns),
                    trace.share(trace.dns)
                ),
            ));
        }
    }

    if !trace.tcp_connect.is_zero() {
        if trace.tcp_connect < ms(20) {
            insights.push(Insight::new(
                Tone::Good,
                "Fast TCP connection (server nearby)",
            ));
        } else if trace.tcp_connect > ms(100) {
            insights.push(Insight::new(
                Tone::Warning,
                format!(
                    "Slow TCP connection ({}, {:.1}% of total) - server may be far away",
                    format_duration(trace.tcp_connect),
                    trace.share(trace.tcp_connect)
                ),
            ));
        }
    }

    if !trace.tls_handshake.is_zero() {
        if trace.tls_handshake < ms(50) {
            insights.push(Insight::new(Tone::Good, "Fast TLS handshake"));
        } else if trace.tls_handshake > ms(200) {
            insights.push(Insight::new(
                Tone::Warning,
                format!(
                    "Slow TLS handshake ({}, {:.1}% of total) - consider connection reuse",
                    format_duration(trace.tls_handshake),
                    trace.share(trace.tls_handshake)
                ),
            ));
        }
    }

    if !trace.server_processing.is_zero() {
        let share = trace.share(trace.server_processing);
        if trace.server_processing < ms(100) {
            insights.push(Insight::new(Tone::Good, "Fast server processing"));
        } else if trace.server_processing > ms(500) {
            insights.push(Insight::new(
                Tone::Warning,
                format!(
                    "Slow server processing ({}, {share:.1}% of total) - backend optimization needed",
                    format_duration(trace.server_processing)
                ),
            ));
        }
        if share > 50.0 {
            insights.push(Insight::new(
                Tone::Warning,
                format!("Server processing is {share:.1}% of total time - main bottleneck"),
            ));
        }
    }

    if !trace.content_transfer.is_zero() && trace.size_bytes > 0 {
        let share = trace.share(trace.content_transfer);
        if trace.content_transfer < ms(50) {
            insights.push(Insight::new(Tone::Good, "Fast content transfer"));
        } else if share > 20.0 {
            insights.push(Insight::new(
                Tone::Warning,
                format!(
                    "Slow content transfer ({share:.1}% of total) - consider compression or CDN"
                ),
            ));
        }
    }

    if trace.total < FAST_THRESHOLD {
        insights.push(Insight::new(
            Tone::Notable,
            "Excellent overall performance (< 200ms)",
        ));
    } else if trace.total > Duration::from_secs(1) {
        insights.push(Insight::new(
            Tone::Critical,
            "Poor overall performance (> 1s) - multiple issues need attention",
        ));
    }

    if insights.is_empty() {
        insights.push(Insight::new(Tone::Good, "No major issues detected"));
    }

    insights
}
