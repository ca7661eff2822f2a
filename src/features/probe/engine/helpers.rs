use crate::probe::{ProbeError, ProbeErrorKind};
use curl::Error as CurlError;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

// CURLINFO constants not exposed by curl-sys
// See: https://curl.se/libcurl/c/CURLINFO_HTTP_VERSION.html
// Use curl_sys::CURLINFO type for cross-platform compatibility (i32 on Windows, u32 on Unix)
const CURLINFO_LONG: curl_sys::CURLINFO = 0x200000;
const CURLINFO_HTTP_VERSION: curl_sys::CURLINFO = CURLINFO_LONG + 46;

// HTTP version codes returned by CURLINFO_HTTP_VERSION
const CURL_HTTP_VERSION_1_0: i64 = 1;
const CURL_HTTP_VERSION_1_1: i64 = 2;
const CURL_HTTP_VERSION_2_0: i64 = 3;
const CURL_HTTP_VERSION_3: i64 = 30;

pub(super) fn map_curl_error(err: &CurlError) -> ProbeError {
    let kind = if err.is_url_malformed() || err.is_unsupported_protocol() {
        ProbeErrorKind::InvalidRequest
    } else if err.is_couldnt_resolve_host() || err.is_couldnt_resolve_proxy() {
        ProbeErrorKind::Dns
    } else if err.is_operation_timedout() {
        ProbeErrorKind::Timeout
    } else if err.is_couldnt_connect() {
        ProbeErrorKind::Connect
    } else if err.is_ssl_connect_error()
        || err.is_ssl_cacert()
        || err.is_ssl_certproblem()
        || err.is_ssl_cipher()
        || err.is_peer_failed_verification()
    {
        ProbeErrorKind::Tls
    } else if err.code() == curl_sys::CURLE_FTP_WEIRD_SERVER_REPLY
        || err.is_http2_error()
        || err.is_got_nothing()
    {
        ProbeErrorKind::Protocol
    } else {
        ProbeErrorKind::Io
    };

    ProbeError {
        kind,
        message: err.to_string(),
    }
}

/// Parsed `HTTP/x.y CODE REASON` line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct StatusLine {
    pub protocol: String,
    pub code: u16,
    pub reason: String,
}

pub(super) fn parse_status_line(line: &[u8]) -> Option<StatusLine> {
    let text = std::str::from_utf8(line).ok()?.trim_end_matches(['\r', '\n']);
    if !text.starts_with("HTTP/") {
        return None;
    }
    let mut parts = text.splitn(3, ' ');
    let protocol = parts.next()?.to_string();
    let code = parts.next()?.trim().parse::<u16>().ok()?;
    let reason = parts.next().unwrap_or("").trim().to_string();
    Some(StatusLine {
        protocol,
        code,
        reason,
    })
}

/// `"200 OK"` style text; HTTP/2 carries no reason phrase, so fall back to
/// the registered one.
pub(super) fn status_text(code: u16, reason: &str) -> String {
    let reason = if reason.is_empty() {
        canonical_reason(code)
    } else {
        reason
    };
    if reason.is_empty() {
        code.to_string()
    } else {
        format!("{code} {reason}")
    }
}

fn canonical_reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        409 => "Conflict",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

pub(super) fn parse_socket_addr(ip: Option<&str>, port: Option<u16>) -> Option<SocketAddr> {
    let port = port?;
    let ip = ip?.parse::<IpAddr>().ok()?;
    Some(SocketAddr::new(ip, port))
}

pub(super) fn saturating_sub(left: Duration, right: Duration) -> Duration {
    left.checked_sub(right).unwrap_or(Duration::from_millis(0))
}

/// Content-Length as curl reports it; negative means unknown.
pub(super) fn content_length(raw: f64) -> i64 {
    if raw < 0.0 { -1 } else { raw as i64 }
}

/// Declared Content-Length, else the bytes actually received, else `-1`.
pub(super) fn response_size(declared: i64, received: u64) -> i64 {
    if declared >= 0 {
        declared
    } else if received > 0 {
        i64::try_from(received).unwrap_or(i64::MAX)
    } else {
        -1
    }
}

pub(super) fn fetch_http_version(handle: *mut curl_sys::CURL) -> Option<String> {
    if handle.is_null() {
        return None;
    }

    unsafe {
        let mut version: std::os::raw::c_long = 0;
        let rc = curl_sys::curl_easy_getinfo(
            handle,
            CURLINFO_HTTP_VERSION,
            &mut version as *mut std::os::raw::c_long,
        );

        if rc != curl_sys::CURLE_OK {
            return None;
        }

        match version as i64 {
            CURL_HTTP_VERSION_1_0 => Some("HTTP/1.0".to_string()),
            CURL_HTTP_VERSION_1_1 => Some("HTTP/1.1".to_string()),
            CURL_HTTP_VERSION_2_0 => Some("HTTP/2.0".to_string()),
            CURL_HTTP_VERSION_3 => Some("HTTP/3.0".to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        content_length, map_curl_error, parse_socket_addr, parse_status_line, response_size,
        saturating_sub, status_text,
    };
    use crate::probe::ProbeErrorKind;
    use curl::Error as CurlError;
    use std::time::Duration;

    #[test]
    fn parse_status_line_http1() {
        let line = parse_status_line(b"HTTP/1.1 404 Not Found\r\n").expect("status line");
        assert_eq!(line.protocol, "HTTP/1.1");
        assert_eq!(line.code, 404);
        assert_eq!(line.reason, "Not Found");
    }

    #[test]
    fn parse_status_line_http2_without_reason() {
        let line = parse_status_line(b"HTTP/2 200 \r\n").expect("status line");
        assert_eq!(line.protocol, "HTTP/2");
        assert_eq!(line.code, 200);
        assert_eq!(line.reason, "");
    }

    #[test]
    fn parse_status_line_ignores_headers() {
        assert!(parse_status_line(b"Content-Type: text/plain\r\n").is_none());
        assert!(parse_status_line(b"\r\n").is_none());
    }

    #[test]
    fn status_text_uses_canonical_reason_when_missing() {
        assert_eq!(status_text(200, ""), "200 OK");
        assert_eq!(status_text(503, "Down For Maintenance"), "503 Down For Maintenance");
        assert_eq!(status_text(599, ""), "599");
    }

    #[test]
    fn content_length_unknown_is_negative_one() {
        assert_eq!(content_length(-1.0), -1);
        assert_eq!(content_length(1024.0), 1024);
    }

    #[test]
    fn response_size_falls_back_to_received_bytes() {
        assert_eq!(response_size(512, 100), 512);
        assert_eq!(response_size(-1, 2048), 2048);
        assert_eq!(response_size(-1, 0), -1);
        assert_eq!(response_size(0, 0), 0);
    }

    #[test]
    fn curl_errors_map_to_kinds() {
        let cases = [
            (curl_sys::CURLE_COULDNT_RESOLVE_HOST, ProbeErrorKind::Dns),
            (curl_sys::CURLE_COULDNT_CONNECT, ProbeErrorKind::Connect),
            (curl_sys::CURLE_OPERATION_TIMEDOUT, ProbeErrorKind::Timeout),
            (curl_sys::CURLE_SSL_CONNECT_ERROR, ProbeErrorKind::Tls),
            (curl_sys::CURLE_FTP_WEIRD_SERVER_REPLY, ProbeErrorKind::Protocol),
            (curl_sys::CURLE_GOT_NOTHING, ProbeErrorKind::Protocol),
            (curl_sys::CURLE_URL_MALFORMAT, ProbeErrorKind::InvalidRequest),
            (curl_sys::CURLE_RECV_ERROR, ProbeErrorKind::Io),
        ];
        for (code, kind) in cases {
            let err = CurlError::new(code);
            let mapped = map_curl_error(&err);
            assert_eq!(mapped.kind, kind, "code {code}");
            assert_eq!(mapped.message, err.to_string());
        }
    }

    #[test]
    fn parse_socket_addr_accepts_valid_values() {
        let addr = parse_socket_addr(Some("127.0.0.1"), Some(443)).expect("addr");
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 443);
    }

    #[test]
    fn parse_socket_addr_rejects_invalid_values() {
        assert!(parse_socket_addr(Some("not-an-ip"), Some(80)).is_none());
        assert!(parse_socket_addr(None, Some(80)).is_none());
        assert!(parse_socket_addr(Some("127.0.0.1"), None).is_none());
    }

    #[test]
    fn saturating_sub_handles_underflow() {
        let result = saturating_sub(Duration::from_millis(5), Duration::from_millis(10));
        assert_eq!(result, Duration::from_millis(0));
    }
}
