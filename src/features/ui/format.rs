use crate::common::time::format_duration;
use crate::config::{FAST_THRESHOLD, SLOW_THRESHOLD};
use crossterm::style::{Color, StyledContent, Stylize};
use std::time::Duration;

const SENSITIVE_HEADERS: [&str; 5] = ["authorization", "api-key", "x-api-key", "token", "password"];

pub(crate) fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

pub fn format_bytes(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = 1024 * KB;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

pub fn is_sensitive_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SENSITIVE_HEADERS.iter().any(|needle| lower.contains(needle))
}

/// `***` plus the last four characters, or just `***` for short values.
pub fn mask_value(value: &str) -> String {
    let count = value.chars().count();
    if count <= 4 {
        return "***".to_string();
    }
    let tail: String = value.chars().skip(count - 4).collect();
    format!("***{tail}")
}

pub fn display_header_value(name: &str, value: &str) -> String {
    if is_sensitive_header(name) {
        mask_value(value)
    } else {
        value.to_string()
    }
}

pub(crate) fn latency_color(latency: Duration) -> Color {
    if latency < FAST_THRESHOLD {
        Color::Green
    } else if latency < SLOW_THRESHOLD {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub(crate) fn colored_latency(latency: Duration) -> StyledContent<String> {
    format_duration(latency).with(latency_color(latency))
}

pub(crate) fn rate_color(rate: f64) -> Color {
    if rate >= 100.0 {
        Color::Green
    } else if rate >= 80.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub(crate) fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Blue,
        400..=499 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Fixed-width bar scaled against `max`; never empty for a non-zero value.
pub(crate) fn bar(value: Duration, max: Duration, width: usize, fill: char, empty: char) -> String {
    let filled = if max.is_zero() {
        0
    } else {
        let ratio = value.as_secs_f64() / max.as_secs_f64();
        ((ratio * width as f64) as usize).min(width)
    };
    let filled = if filled == 0 && !value.is_zero() && !max.is_zero() {
        1
    } else {
        filled
    };
    let mut out = String::with_capacity(width * 3);
    out.extend(std::iter::repeat_n(fill, filled));
    out.extend(std::iter::repeat_n(empty, width - filled));
    out
}

pub(crate) fn rule(width: usize) -> String {
    "─".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_keeps_short_values() {
        assert_eq!(truncate_string("users", 20), "users");
        assert_eq!(truncate_string("exactly-twenty-chars", 20), "exactly-twenty-chars");
    }

    #[test]
    fn truncate_string_adds_ellipsis() {
        let out = truncate_string("a-very-long-endpoint-name", 20);
        assert_eq!(out, "a-very-long-endpo...");
        assert_eq!(out.chars().count(), 20);
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024 / 2), "1.50 MB");
    }

    #[test]
    fn sensitive_headers_are_masked() {
        assert!(is_sensitive_header("Authorization"));
        assert!(is_sensitive_header("X-Api-Key"));
        assert!(is_sensitive_header("X-Auth-Token"));
        assert!(!is_sensitive_header("Content-Type"));

        assert_eq!(display_header_value("Authorization", "Bearer abc12345"), "***2345");
        assert_eq!(display_header_value("Password", "abcd"), "***");
        assert_eq!(display_header_value("Accept", "application/json"), "application/json");
    }

    #[test]
    fn latency_and_rate_colors() {
        assert_eq!(latency_color(Duration::from_millis(50)), Color::Green);
        assert_eq!(latency_color(Duration::from_millis(300)), Color::Yellow);
        assert_eq!(latency_color(Duration::from_millis(800)), Color::Red);
        assert_eq!(rate_color(100.0), Color::Green);
        assert_eq!(rate_color(85.0), Color::Yellow);
        assert_eq!(rate_color(10.0), Color::Red);
        assert_eq!(status_color(204), Color::Green);
        assert_eq!(status_color(503), Color::Red);
    }

    #[test]
    fn bar_scales_and_clamps() {
        let ms = Duration::from_millis;
        assert_eq!(bar(ms(50), ms(100), 10, '#', '.'), "#####.....");
        assert_eq!(bar(ms(200), ms(100), 4, '#', '.'), "####");
        assert_eq!(bar(ms(1), ms(1000), 4, '#', '.'), "#...");
        assert_eq!(bar(ms(0), ms(1000), 4, '#', '.'), "....");
        assert_eq!(bar(ms(5), Duration::ZERO, 3, '#', '.'), "...");
    }
}
