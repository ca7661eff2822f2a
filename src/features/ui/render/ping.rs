use crate::common::time::format_duration;
use crate::features::ui::format::{colored_latency, display_header_value, format_bytes};
use crate::probe::ProbeResult;
use crate::probe_engine::ProbeRequest;
use crossterm::style::Stylize;
use std::io::{self, Write};

/// Verbose request echo. Sensitive header values are masked.
pub fn write_request_details<W: Write>(
    out: &mut W,
    request: &ProbeRequest,
    retries: u32,
) -> io::Result<()> {
    writeln!(out, "   Request")?;
    writeln!(out, "   URL:     {}", request.url.as_str().blue())?;
    writeln!(out, "   Method:  {}", request.method)?;
    writeln!(out, "   Timeout: {}", format_duration(request.timeout))?;
    if retries > 0 {
        writeln!(out, "   Retries: {retries}")?;
    }
    if !request.headers.is_empty() {
        writeln!(out, "   Headers: {} total", request.headers.len())?;
        for (name, value) in &request.headers {
            writeln!(out, "     {name}: {}", display_header_value(name, value.expose()))?;
        }
    }
    writeln!(out)
}

pub fn write_ping_success<W: Write>(out: &mut W, result: &ProbeResult) -> io::Result<()> {
    writeln!(out, "{} Success", "✓".green())?;
    writeln!(out, "  Status:   {}", result.status_text)?;
    writeln!(out, "  Latency:  {}", colored_latency(result.latency))?;
    if !result.protocol.is_empty() {
        writeln!(out, "  Protocol: {}", result.protocol)?;
    }
    if result.size_bytes > 0 {
        writeln!(out, "  Size:     {}", format_bytes(result.size_bytes))?;
    }
    Ok(())
}

pub fn write_ping_failure<W: Write>(out: &mut W, result: &ProbeResult) -> io::Result<()> {
    writeln!(out, "{} Failed to ping {}", "✗".red(), result.url)?;
    match result.error() {
        Some(err) => writeln!(out, "  Error: {err}"),
        None => writeln!(out, "  Status: {}", result.status_text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HttpMethod, SecretString};
    use crate::probe::ProbeErrorKind;
    use std::time::Duration;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn request_details_mask_secrets() {
        let mut request = ProbeRequest::new("https://api.example.com", HttpMethod::Post, Duration::from_secs(5));
        request.headers = vec![
            ("Authorization".to_string(), SecretString::new("Bearer secret-9876")),
            ("Accept".to_string(), SecretString::new("application/json")),
        ];
        let text = render(|out| write_request_details(out, &request, 2));

        assert!(text.contains("Method:  POST"));
        assert!(text.contains("Timeout: 5s"));
        assert!(text.contains("Retries: 2"));
        assert!(text.contains("Authorization: ***9876"));
        assert!(!text.contains("secret-9876"));
        assert!(text.contains("Accept: application/json"));
    }

    #[test]
    fn success_and_failure_views() {
        let ok = ProbeResult::response(
            "https://api.example.com",
            Duration::from_millis(90),
            200,
            "200 OK",
            4096,
            "HTTP/2.0",
        );
        let text = render(|out| write_ping_success(out, &ok));
        assert!(text.contains("Status:   200 OK"));
        assert!(text.contains("Protocol: HTTP/2.0"));
        assert!(text.contains("Size:     4.00 KB"));

        let failed = ProbeResult::failed(
            "https://api.example.com",
            Duration::from_millis(3),
            ProbeErrorKind::Connect,
            "connection refused",
        );
        let text = render(|out| write_ping_failure(out, &failed));
        assert!(text.contains("Failed to ping https://api.example.com"));
        assert!(text.contains("Error: connection refused"));
    }
}
