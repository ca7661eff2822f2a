mod batch;
mod request;
mod single;
mod watch;

pub use batch::{emit_batch, run_batch_command};
pub use request::build_request;
pub use single::{run_ping, run_trace};
pub use watch::run_watch;

use crate::batch::{BatchError, BatchSummary};
use crate::data_model::settings::{AppSettings, Command, OutputFormat};
use crate::loader::LoadError;
use crate::probe_engine::CurlProbe;
use std::io;
use thiserror::Error;

/// Process outcome, mapped onto exit codes for CI use.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Healthy,
    Unhealthy,
    SetupError,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Outcome::Healthy => 0,
            Outcome::Unhealthy => 1,
            Outcome::SetupError => 2,
        }
    }

    pub fn from_summary(summary: &BatchSummary) -> Self {
        if summary.failed > 0 {
            Outcome::Unhealthy
        } else {
            Outcome::Healthy
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error("http client init failed: {0}")]
    Client(#[from] curl::Error),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Output switches shared by every command.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OutputMode {
    pub format: OutputFormat,
    pub quiet: bool,
    pub silent: bool,
    pub verbose: bool,
}

impl OutputMode {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            format: settings.output,
            quiet: settings.quiet,
            silent: settings.silent,
            verbose: settings.verbose,
        }
    }

    /// Banners, tables and other decoration.
    pub fn chatty(self) -> bool {
        !self.quiet && !self.silent
    }

    /// Failure reports, still shown under `--quiet`.
    pub fn errors(self) -> bool {
        !self.silent
    }
}

pub fn run(settings: &AppSettings) -> Result<Outcome, AppError> {
    let mode = OutputMode::from_settings(settings);
    match &settings.command {
        Command::Version => {
            if mode.errors() {
                println!("apiprobe version {}", env!("CARGO_PKG_VERSION"));
            }
            Ok(Outcome::Healthy)
        }
        Command::Ping(ping) => run_ping(ping, mode),
        Command::Trace(request) => run_trace(request, mode),
        Command::Watch(watch) => run_watch(watch, mode),
        Command::Batch(batch) => run_batch_command(
            batch,
            mode,
            CurlProbe,
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_codes() {
        assert_eq!(Outcome::Healthy.code(), 0);
        assert_eq!(Outcome::Unhealthy.code(), 1);
        assert_eq!(Outcome::SetupError.code(), 2);
    }

    #[test]
    fn outcome_follows_failed_count() {
        let mut summary = BatchSummary::new();
        assert_eq!(Outcome::from_summary(&summary), Outcome::Healthy);
        summary.failed = 1;
        assert_eq!(Outcome::from_summary(&summary), Outcome::Unhealthy);
    }

    #[test]
    fn output_mode_switches() {
        let mode = OutputMode::default();
        assert!(mode.chatty() && mode.errors());

        let quiet = OutputMode {
            quiet: true,
            ..mode
        };
        assert!(!quiet.chatty() && quiet.errors());

        let silent = OutputMode {
            silent: true,
            ..mode
        };
        assert!(!silent.chatty() && !silent.errors());
    }
}
