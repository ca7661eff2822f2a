use super::{AppError, OutputMode, Outcome};
use crate::batch::{BatchOptions, BatchSummary, run_batch_with};
use crate::data_model::settings::{BatchSettings, OutputFormat};
use crate::loader::load_batch;
use crate::probe_engine::EndpointProbe;
use crate::ui::{
    BatchReport, write_batch_banner, write_batch_table, write_csv, write_failure_line,
    write_stop_notice,
};
use std::io::Write;
use std::time::Duration;
use tracing::{info, warn};

/// Loads the batch file, runs it, and renders the summary.
///
/// Failures stream to `err` as they arrive under `--quiet`; the report goes to
/// `out` once the run is over.
pub fn run_batch_command<P, W, E>(
    settings: &BatchSettings,
    mode: OutputMode,
    probe: P,
    out: &mut W,
    err: &mut E,
) -> Result<Outcome, AppError>
where
    P: EndpointProbe + 'static,
    W: Write,
    E: Write,
{
    let file = load_batch(&settings.file)?;
    let options = BatchOptions {
        concurrency: settings.concurrency.unwrap_or(file.concurrency),
        max_time: settings.max_time,
        fail_fast: settings.fail_fast,
        default_timeout: file.timeout,
    };
    info!(
        file = %settings.file.display(),
        endpoints = file.endpoints.len(),
        concurrency = options.concurrency,
        "loaded batch file"
    );

    if mode.chatty() && mode.format == OutputFormat::Pretty {
        write_batch_banner(out, file.endpoints.len(), options.concurrency)?;
        out.flush()?;
    }

    let stream_failures = mode.quiet && mode.errors();
    let summary = run_batch_with(&file.endpoints, &options, probe, |result| {
        if stream_failures
            && !result.success
            && let Err(io_err) = write_failure_line(err, result)
        {
            warn!("could not report failure: {io_err}");
        }
    })?;

    emit_batch(out, err, &summary, mode, options.max_time)?;
    Ok(Outcome::from_summary(&summary))
}

/// Writes the finished batch in the selected format. Stop notices go to
/// `err` so machine-readable output stays parseable.
pub fn emit_batch<W: Write, E: Write>(
    out: &mut W,
    err: &mut E,
    summary: &BatchSummary,
    mode: OutputMode,
    max_time: Option<Duration>,
) -> Result<(), AppError> {
    if mode.silent {
        return Ok(());
    }
    write_stop_notice(err, summary, max_time)?;

    match mode.format {
        OutputFormat::Json => {
            writeln!(out, "{}", BatchReport::from(summary).to_json()?)?;
        }
        OutputFormat::Csv => {
            write!(out, "{}", write_csv(&BatchReport::from(summary).results))?;
        }
        OutputFormat::Pretty if !mode.quiet => write_batch_table(out, summary)?,
        OutputFormat::Pretty => {}
    }
    out.flush()?;
    Ok(())
}
