use std::fmt;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(2);
pub const WATCH_HISTORY_CAPACITY: usize = 10;
pub const WATCH_RECENT_ROWS: usize = 5;

/// Responses faster than this render green.
pub const FAST_THRESHOLD: Duration = Duration::from_millis(200);
/// Responses slower than this are flagged as slow.
pub const SLOW_THRESHOLD: Duration = Duration::from_millis(500);

/// Ordered header list. Names are opaque strings; a later entry with the same
/// name replaces an earlier one when merged.
pub type Headers = Vec<(String, SecretString)>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "HEAD" => Some(HttpMethod::Head),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "OPTIONS" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One target of a batch run. Read-only once loaded.
#[derive(Clone, Debug)]
pub struct EndpointSpec {
    pub name: String,
    pub url: String,
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Option<String>,
    pub expected_status: u16,
    pub timeout: Option<Duration>,
}

impl EndpointSpec {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method: HttpMethod::Get,
            headers: Vec::new(),
            body: None,
            expected_status: DEFAULT_EXPECTED_STATUS,
            timeout: None,
        }
    }

    pub fn effective_timeout(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }
}

#[derive(Clone, Eq, PartialEq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_method_parse_is_case_insensitive() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse(" Post "), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("DELETE"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::parse("FETCH"), None);
    }

    #[test]
    fn http_method_display_is_uppercase() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
    }

    #[test]
    fn endpoint_spec_defaults() {
        let spec = EndpointSpec::new("users", "https://api.example.com/users");
        assert_eq!(spec.method, HttpMethod::Get);
        assert_eq!(spec.expected_status, 200);
        assert_eq!(spec.effective_timeout(DEFAULT_TIMEOUT), DEFAULT_TIMEOUT);

        let spec = EndpointSpec {
            timeout: Some(Duration::from_secs(2)),
            ..spec
        };
        assert_eq!(
            spec.effective_timeout(DEFAULT_TIMEOUT),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn secret_string_redacts_debug_and_display() {
        let secret = SecretString::new("token-value");

        let debug_text = format!("{secret:?}");
        let display_text = secret.to_string();

        assert!(!debug_text.contains("token-value"));
        assert!(!display_text.contains("token-value"));
        assert_eq!(display_text, "[REDACTED]");
        assert_eq!(secret.expose(), "token-value");
    }
}
