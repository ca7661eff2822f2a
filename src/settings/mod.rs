use crate::common::net::parse_probe_url;
use crate::config::{DEFAULT_WATCH_INTERVAL, HttpMethod};
use crate::data_model::settings::{
    AppSettings, BatchSettings, Command, OutputFormat, PingSettings, RequestSettings,
    WatchSettings,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "apiprobe", version)]
#[command(about = "Fast API health checker and latency tester", long_about = None)]
#[command(args_conflicts_with_subcommands = true, arg_required_else_help = true)]
pub struct CliArgs {
    #[command(subcommand)]
    command: Option<CommandArgs>,

    /// URL to ping when no subcommand is given
    #[arg(value_name = "URL")]
    url: Option<String>,

    #[command(flatten)]
    request: RequestArgs,

    /// Retry attempts on failure (backoff 1s, 2s, 4s, ...)
    #[arg(short, long, default_value_t = 0)]
    retries: u32,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Subcommand, Debug)]
enum CommandArgs {
    /// Send a single request
    Ping {
        #[arg(value_name = "URL")]
        url: String,
        #[command(flatten)]
        request: RequestArgs,
        /// Retry attempts on failure (backoff 1s, 2s, 4s, ...)
        #[arg(short, long, default_value_t = 0)]
        retries: u32,
    },
    /// Continuously monitor an endpoint
    Watch {
        #[arg(value_name = "URL")]
        url: String,
        #[command(flatten)]
        request: RequestArgs,
        /// Time between requests
        #[arg(short, long, value_parser = humantime::parse_duration)]
        interval: Option<Duration>,
        /// Number of requests (0 = until interrupted)
        #[arg(short = 'n', long, default_value_t = 0)]
        count: u64,
    },
    /// Test the endpoints listed in a YAML file
    Batch {
        #[arg(value_name = "CONFIG")]
        file: PathBuf,
        /// Concurrent requests (overrides the file)
        #[arg(short, long)]
        concurrency: Option<usize>,
        /// Stop admitting endpoints after the first failure
        #[arg(long)]
        fail_fast: bool,
        /// Limit for the whole batch, e.g. 30s or 5m
        #[arg(long, value_parser = humantime::parse_duration)]
        max_time: Option<Duration>,
    },
    /// Show the timing breakdown of one request
    Trace {
        #[arg(value_name = "URL")]
        url: String,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Print the version
    Version,
}

#[derive(Args, Debug, Clone)]
struct RequestArgs {
    /// Maximum time to wait for the response
    #[arg(short, long, default_value = "10s", value_parser = humantime::parse_duration)]
    timeout: Duration,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// YAML file with request headers
    #[arg(long = "headers", value_name = "FILE")]
    header_file: Option<PathBuf>,

    /// Extra header as 'Key: Value' (repeatable)
    #[arg(short = 'H', long = "header", value_name = "KEY: VALUE")]
    inline_headers: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct GlobalArgs {
    /// Output format: pretty, json, csv
    #[arg(short, long, global = true, default_value = "pretty")]
    output: String,

    /// Only report failures
    #[arg(short, long, global = true)]
    quiet: bool,

    /// No output at all, only the exit code
    #[arg(long, global = true)]
    silent: bool,

    /// Show request details and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum SettingsError {
    #[error("a URL is required")]
    MissingUrl,
    #[error("invalid URL '{url}' (expected http:// or https://)")]
    InvalidUrl { url: String },
    #[error("unsupported HTTP method '{value}'")]
    UnknownMethod { value: String },
    #[error("unknown output format '{value}' (expected pretty, json or csv)")]
    UnknownOutput { value: String },
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("watch interval must be greater than zero")]
    ZeroInterval,
    #[error("concurrency must be at least 1 (got {value})")]
    InvalidConcurrency { value: usize },
}

pub fn load_from_cli() -> Result<AppSettings, SettingsError> {
    let args = CliArgs::parse();
    from_args(args)
}

pub fn from_args(args: CliArgs) -> Result<AppSettings, SettingsError> {
    let output = OutputFormat::parse(&args.global.output).ok_or_else(|| {
        SettingsError::UnknownOutput {
            value: args.global.output.clone(),
        }
    })?;

    let command = match args.command {
        None => {
            let url = args.url.ok_or(SettingsError::MissingUrl)?;
            Command::Ping(PingSettings {
                request: request_settings(url, args.request)?,
                retries: args.retries,
            })
        }
        Some(CommandArgs::Ping {
            url,
            request,
            retries,
        }) => Command::Ping(PingSettings {
            request: request_settings(url, request)?,
            retries,
        }),
        Some(CommandArgs::Watch {
            url,
            request,
            interval,
            count,
        }) => {
            let interval = interval.unwrap_or(DEFAULT_WATCH_INTERVAL);
            if interval.is_zero() {
                return Err(SettingsError::ZeroInterval);
            }
            Command::Watch(WatchSettings {
                request: request_settings(url, request)?,
                interval,
                count,
            })
        }
        Some(CommandArgs::Batch {
            file,
            concurrency,
            fail_fast,
            max_time,
        }) => {
            if let Some(value @ 0) = concurrency {
                return Err(SettingsError::InvalidConcurrency { value });
            }
            Command::Batch(BatchSettings {
                file,
                concurrency,
                fail_fast,
                // zero means no limit
                max_time: max_time.filter(|limit| !limit.is_zero()),
            })
        }
        Some(CommandArgs::Trace { url, request }) => {
            Command::Trace(request_settings(url, request)?)
        }
        Some(CommandArgs::Version) => Command::Version,
    };

    Ok(AppSettings {
        output,
        quiet: args.global.quiet,
        silent: args.global.silent,
        verbose: args.global.verbose,
        command,
    })
}

fn request_settings(url: String, args: RequestArgs) -> Result<RequestSettings, SettingsError> {
    if parse_probe_url(&url).is_none() {
        return Err(SettingsError::InvalidUrl { url });
    }
    let method =
        HttpMethod::parse(&args.method).ok_or_else(|| SettingsError::UnknownMethod {
            value: args.method.clone(),
        })?;
    if args.timeout.is_zero() {
        return Err(SettingsError::ZeroTimeout);
    }

    Ok(RequestSettings {
        url: url.trim().to_string(),
        method,
        timeout: args.timeout,
        header_file: args.header_file,
        inline_headers: args.inline_headers,
    })
}
