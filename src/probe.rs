use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// Outcome of one request attempt. `latency` is populated even on failure;
/// status fields are only meaningful when `outcome` is `Ok`.
#[derive(Clone, Debug)]
pub struct ProbeResult {
    pub url: String,
    pub latency: Duration,
    pub outcome: ProbeOutcome,
    pub status: u16,
    pub status_text: String,
    /// Content-Length announced by the server, `-1` when unknown.
    pub size_bytes: i64,
    pub protocol: String,
}

#[derive(Clone, Debug)]
pub enum ProbeOutcome {
    Ok,
    Err(ProbeError),
}

impl ProbeResult {
    pub fn response(
        url: impl Into<String>,
        latency: Duration,
        status: u16,
        status_text: impl Into<String>,
        size_bytes: i64,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            latency,
            outcome: ProbeOutcome::Ok,
            status,
            status_text: status_text.into(),
            size_bytes,
            protocol: protocol.into(),
        }
    }

    pub fn failed(
        url: impl Into<String>,
        latency: Duration,
        kind: ProbeErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            latency,
            outcome: ProbeOutcome::Err(ProbeError {
                kind,
                message: message.into(),
            }),
            status: 0,
            status_text: String::new(),
            size_bytes: -1,
            protocol: String::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Ok)
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match &self.outcome {
            ProbeOutcome::Ok => None,
            ProbeOutcome::Err(err) => Some(err),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ProbeErrorKind {
    Dns,
    Connect,
    Tls,
    Timeout,
    Protocol,
    InvalidRequest,
    Io,
}

impl ProbeErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProbeErrorKind::Dns => "dns",
            ProbeErrorKind::Connect => "connect",
            ProbeErrorKind::Tls => "tls",
            ProbeErrorKind::Timeout => "timeout",
            ProbeErrorKind::Protocol => "protocol",
            ProbeErrorKind::InvalidRequest => "invalid_request",
            ProbeErrorKind::Io => "io",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProbeError {
    pub kind: ProbeErrorKind,
    pub message: String,
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TracePhase {
    Dns,
    TcpConnect,
    TlsHandshake,
    ServerProcessing,
    ContentTransfer,
}

impl TracePhase {
    pub fn label(self) -> &'static str {
        match self {
            TracePhase::Dns => "DNS Lookup",
            TracePhase::TcpConnect => "TCP Connection",
            TracePhase::TlsHandshake => "TLS Handshake",
            TracePhase::ServerProcessing => "Server Processing",
            TracePhase::ContentTransfer => "Content Transfer",
        }
    }
}

/// Per-phase timing of a single request made over a fresh connection.
#[derive(Clone, Debug)]
pub struct TraceResult {
    pub url: String,
    pub dns: Duration,
    pub tcp_connect: Duration,
    pub tls_handshake: Duration,
    pub server_processing: Duration,
    pub content_transfer: Duration,
    pub total: Duration,
    pub outcome: ProbeOutcome,
    pub status: u16,
    pub status_text: String,
    pub protocol: String,
    pub remote: Option<SocketAddr>,
    pub size_bytes: i64,
}

impl TraceResult {
    pub fn phases(&self) -> [(TracePhase, Duration); 5] {
        [
            (TracePhase::Dns, self.dns),
            (TracePhase::TcpConnect, self.tcp_connect),
            (TracePhase::TlsHandshake, self.tls_handshake),
            (TracePhase::ServerProcessing, self.server_processing),
            (TracePhase::ContentTransfer, self.content_transfer),
        ]
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match &self.outcome {
            ProbeOutcome::Ok => None,
            ProbeOutcome::Err(err) => Some(err),
        }
    }

    /// Share of the total time spent in `phase`, in percent.
    pub fn share(&self, phase: Duration) -> f64 {
        if self.total.is_zero() {
            return 0.0;
        }
        phase.as_secs_f64() / self.total.as_secs_f64() * 100.0
    }
}
