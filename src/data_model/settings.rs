use crate::config::HttpMethod;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(OutputFormat::Pretty),
            "json" => Some(OutputFormat::Json),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub output: OutputFormat,
    pub quiet: bool,
    pub silent: bool,
    pub verbose: bool,
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Ping(PingSettings),
    Watch(WatchSettings),
    Batch(BatchSettings),
    Trace(RequestSettings),
    Version,
}

/// Target and request shape shared by the single-endpoint commands.
#[derive(Debug, Clone)]
pub struct RequestSettings {
    pub url: String,
    pub method: HttpMethod,
    pub timeout: Duration,
    pub header_file: Option<PathBuf>,
    pub inline_headers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PingSettings {
    pub request: RequestSettings,
    pub retries: u32,
}

#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub request: RequestSettings,
    pub interval: Duration,
    /// Zero means run until interrupted.
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub file: PathBuf,
    pub concurrency: Option<usize>,
    pub fail_fast: bool,
    pub max_time: Option<Duration>,
}
