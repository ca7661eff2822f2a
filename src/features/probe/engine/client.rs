use super::ProbeRequest;
use super::helpers::{
    StatusLine, content_length, fetch_http_version, map_curl_error, parse_socket_addr,
    parse_status_line, response_size, saturating_sub, status_text,
};
use crate::config::HttpMethod;
use crate::probe::{ProbeErrorKind, ProbeOutcome, ProbeResult, TraceResult};
use curl::Error as CurlError;
use curl::easy::{Easy2, Handler, List, WriteError};
use std::time::{Duration, Instant};
use tracing::debug;

const MAX_REDIRECTS: u32 = 10;

/// Counts body bytes and keeps the last status line seen in the header stream.
#[derive(Default)]
struct ResponseCollector {
    bytes: u64,
    status_line: Option<StatusLine>,
}

impl ResponseCollector {
    fn reset(&mut self) {
        self.bytes = 0;
        self.status_line = None;
    }
}

impl Handler for ResponseCollector {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        self.bytes = self.bytes.saturating_add(data.len() as u64);
        Ok(data.len())
    }

    fn header(&mut self, data: &[u8]) -> bool {
        // Interim 1xx responses come first; the final status line wins.
        if let Some(line) = parse_status_line(data) {
            self.status_line = Some(line);
        }
        true
    }
}

pub struct ProbeClient {
    easy: Easy2<ResponseCollector>,
}

impl ProbeClient {
    pub fn new() -> Result<Self, CurlError> {
        let mut easy = Easy2::new(ResponseCollector::default());
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        Ok(Self { easy })
    }

    /// One attempt, no retries. Transport failures are captured in the result.
    ///
    /// Latency runs until the final response starts arriving, redirects
    /// included; the body download is not part of it.
    pub fn ping(&mut self, request: &ProbeRequest) -> ProbeResult {
        let started = Instant::now();
        if let Err(err) = self.prepare(request, false) {
            return ProbeResult::failed(
                request.url.as_str(),
                started.elapsed(),
                ProbeErrorKind::InvalidRequest,
                err.to_string(),
            );
        }

        let performed = self.easy.perform();
        let elapsed = started.elapsed();

        if let Err(err) = performed {
            let error = map_curl_error(&err);
            debug!(url = %request.url, kind = error.kind.label(), "probe failed");
            return ProbeResult::failed(request.url.as_str(), elapsed, error.kind, error.message);
        }

        let latency = self
            .easy
            .starttransfer_time()
            .ok()
            .filter(|ttfb| !ttfb.is_zero())
            .map_or(elapsed, |ttfb| ttfb.min(elapsed));
        let (status, status_text, protocol) = self.response_status();
        let size_bytes = self.size_bytes();

        ProbeResult::response(
            request.url.as_str(),
            latency,
            status,
            status_text,
            size_bytes,
            protocol,
        )
    }

    /// Single request over a fresh connection, broken down by phase.
    pub fn trace(&mut self, request: &ProbeRequest) -> TraceResult {
        let started = Instant::now();
        let prepared = self.prepare(request, true);
        let performed = prepared.and_then(|()| self.easy.perform());

        if let Err(err) = performed {
            let error = map_curl_error(&err);
            debug!(url = %request.url, kind = error.kind.label(), "trace failed");
            return TraceResult {
                url: request.url.clone(),
                dns: Duration::ZERO,
                tcp_connect: Duration::ZERO,
                tls_handshake: Duration::ZERO,
                server_processing: Duration::ZERO,
                content_transfer: Duration::ZERO,
                total: started.elapsed(),
                outcome: ProbeOutcome::Err(error),
                status: 0,
                status_text: String::new(),
                protocol: String::new(),
                remote: None,
                size_bytes: -1,
            };
        }

        let total = self.easy.total_time().unwrap_or_else(|_| started.elapsed());
        let t_dns = self.easy.namelookup_time().unwrap_or_default();
        let t_connect = self.easy.connect_time().unwrap_or(t_dns);
        // appconnect stays zero for plain http
        let t_tls = self.easy.appconnect_time().unwrap_or_default();
        let t_ready = self
            .easy
            .pretransfer_time()
            .unwrap_or_else(|_| t_tls.max(t_connect));
        let t_first_byte = self.easy.starttransfer_time().unwrap_or(t_ready);

        let tls_handshake = if t_tls.is_zero() {
            Duration::ZERO
        } else {
            saturating_sub(t_tls, t_connect)
        };

        let (status, status_text, protocol) = self.response_status();
        let size_bytes = self.size_bytes();
        let remote = parse_socket_addr(
            self.easy.primary_ip().ok().flatten(),
            self.easy.primary_port().ok(),
        );

        TraceResult {
            url: request.url.clone(),
            dns: t_dns,
            tcp_connect: saturating_sub(t_connect, t_dns),
            tls_handshake,
            server_processing: saturating_sub(t_first_byte, t_ready),
            content_transfer: saturating_sub(total, t_first_byte),
            total,
            outcome: ProbeOutcome::Ok,
            status,
            status_text,
            protocol,
            remote,
            size_bytes,
        }
    }

    fn prepare(&mut self, request: &ProbeRequest, fresh_connection: bool) -> Result<(), CurlError> {
        self.easy.reset();
        self.easy.get_mut().reset();
        self.easy.follow_location(true)?;
        self.easy.max_redirections(MAX_REDIRECTS)?;
        self.easy.url(&request.url)?;
        self.easy.timeout(request.timeout)?;
        self.easy.fresh_connect(fresh_connection)?;
        self.easy.forbid_reuse(fresh_connection)?;

        match request.method {
            HttpMethod::Get => self.easy.get(true)?,
            HttpMethod::Head => self.easy.nobody(true)?,
            HttpMethod::Post => {
                self.easy.post(true)?;
                let body = request.body.as_deref().unwrap_or("");
                self.easy.post_fields_copy(body.as_bytes())?;
            }
            other => {
                self.easy.custom_request(other.as_str())?;
                if let Some(body) = request.body.as_deref() {
                    self.easy.post_fields_copy(body.as_bytes())?;
                }
            }
        }

        if !request.headers.is_empty() {
            let mut list = List::new();
            for (name, value) in &request.headers {
                list.append(&format!("{name}: {}", value.expose()))?;
            }
            self.easy.http_headers(list)?;
        }

        Ok(())
    }

    fn size_bytes(&mut self) -> i64 {
        let declared = content_length(self.easy.content_length_download().unwrap_or(-1.0));
        response_size(declared, self.easy.get_ref().bytes)
    }

    fn response_status(&mut self) -> (u16, String, String) {
        let line = self.easy.get_ref().status_line.clone();
        let status = self
            .easy
            .response_code()
            .ok()
            .map(|code| code as u16)
            .or_else(|| line.as_ref().map(|l| l.code))
            .unwrap_or(0);
        let reason = line.as_ref().map(|l| l.reason.as_str()).unwrap_or("");
        let protocol = fetch_http_version(self.easy.raw())
            .or_else(|| line.as_ref().map(|l| l.protocol.clone()))
            .unwrap_or_default();
        (status, status_text(status, reason), protocol)
    }
}
