use super::{AppError, OutputMode, Outcome, build_request};
use crate::config::WATCH_HISTORY_CAPACITY;
use crate::data_model::settings::WatchSettings;
use crate::probe::ProbeResult;
use crate::runtime::spawn_watch_worker;
use crate::stats::{BoundedHistory, RollingTracker};
use crate::ui::{WatchSession, write_live_stats, write_ping_failure, write_watch_banner, write_watch_summary};
use crossbeam_channel::{Receiver, select};
use std::io::{self, Write};
use std::time::Instant;
use tracing::{debug, warn};

/// Why the watch loop ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum WatchEnd {
    Interrupted,
    Finished,
}

struct WatchState {
    tracker: RollingTracker,
    history: BoundedHistory,
}

impl WatchState {
    fn new() -> Self {
        Self {
            tracker: RollingTracker::new(),
            history: BoundedHistory::new(WATCH_HISTORY_CAPACITY),
        }
    }

    fn record<W: Write>(
        &mut self,
        out: &mut W,
        result: ProbeResult,
        mode: OutputMode,
    ) -> io::Result<()> {
        self.tracker.record(result.latency, result.is_ok());
        if mode.chatty() {
            self.history.add(result);
            write_live_stats(out, &self.tracker, &self.history)?;
            out.flush()
        } else {
            if !result.is_ok() && mode.errors() {
                write_ping_failure(out, &result)?;
            }
            self.history.add(result);
            Ok(())
        }
    }
}

pub fn run_watch(settings: &WatchSettings, mode: OutputMode) -> Result<Outcome, AppError> {
    let request = build_request(&settings.request)?;
    let url = request.url.clone();
    let method = request.method;
    let mut out = io::stdout().lock();

    if mode.chatty() {
        write_watch_banner(&mut out, &url, settings.interval, settings.count)?;
        out.flush()?;
    }

    // The local sender keeps the channel open if the handler cannot be installed.
    let (interrupt_tx, interrupt_rx) = crossbeam_channel::bounded(1);
    let handler_tx = interrupt_tx.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        let _ = handler_tx.try_send(());
    }) {
        warn!("could not install Ctrl+C handler: {err}");
    }

    let started = Instant::now();
    let (result_tx, result_rx) = crossbeam_channel::unbounded();
    let mut worker = spawn_watch_worker(request, settings.interval, settings.count, result_tx);

    let mut state = WatchState::new();
    let end = drive(&mut out, &result_rx, &interrupt_rx, mode, &mut state)?;
    worker.stop();
    for result in result_rx.try_iter() {
        state.record(&mut out, result, mode)?;
    }
    drop(interrupt_tx);
    debug!(?end, requests = state.tracker.total(), "watch ended");

    if mode.chatty() {
        let session = WatchSession {
            url,
            method,
            elapsed: started.elapsed(),
            requests: state.tracker.total(),
        };
        write_watch_summary(&mut out, &session, &state.tracker)?;
    }

    Ok(if state.tracker.failed() > 0 {
        Outcome::Unhealthy
    } else {
        Outcome::Healthy
    })
}

fn drive<W: Write>(
    out: &mut W,
    results: &Receiver<ProbeResult>,
    interrupt: &Receiver<()>,
    mode: OutputMode,
    state: &mut WatchState,
) -> io::Result<WatchEnd> {
    loop {
        select! {
            recv(results) -> msg => match msg {
                Ok(result) => state.record(out, result, mode)?,
                Err(_) => return Ok(WatchEnd::Finished),
            },
            recv(interrupt) -> _ => return Ok(WatchEnd::Interrupted),
        }
    }
}
