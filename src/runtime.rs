use crate::probe::{ProbeErrorKind, ProbeResult};
use crate::probe_engine::{ProbeClient, ProbeRequest};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ControlMessage {
    Stop,
}

pub struct WorkerHandle {
    pub sender: Sender<ControlMessage>,
    pub join: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Asks the worker to stop and waits for the in-flight probe to finish.
    pub fn stop(&mut self) {
        let _ = self.sender.send(ControlMessage::Stop);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Probes `request` right away, then once per `interval`, until `count`
/// results were sent (`0` = no limit) or the worker is stopped.
pub fn spawn_watch_worker(
    request: ProbeRequest,
    interval: Duration,
    count: u64,
    result_tx: Sender<ProbeResult>,
) -> WorkerHandle {
    let mut client = ProbeClient::new();
    if let Err(err) = &client {
        warn!("probe client init failed: {err}");
    }
    let probe = move || match &mut client {
        Ok(client) => client.ping(&request),
        Err(err) => ProbeResult::failed(
            request.url.as_str(),
            Duration::ZERO,
            ProbeErrorKind::Io,
            format!("probe client init failed: {err}"),
        ),
    };
    spawn_worker_with(probe, interval, count, result_tx)
}

/// Same loop as [`spawn_watch_worker`] around an arbitrary probe function.
pub fn spawn_worker_with<F>(
    probe: F,
    interval: Duration,
    count: u64,
    result_tx: Sender<ProbeResult>,
) -> WorkerHandle
where
    F: FnMut() -> ProbeResult + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::unbounded();
    let join = thread::spawn(move || run_worker(probe, interval, count, rx, result_tx));
    WorkerHandle {
        sender: tx,
        join: Some(join),
    }
}

fn run_worker<F>(
    mut probe: F,
    interval: Duration,
    count: u64,
    control_rx: Receiver<ControlMessage>,
    result_tx: Sender<ProbeResult>,
) where
    F: FnMut() -> ProbeResult,
{
    debug!(?interval, count, "watch worker started");
    let mut sent: u64 = 0;

    loop {
        if result_tx.send(probe()).is_err() {
            break;
        }
        sent += 1;
        if count > 0 && sent >= count {
            break;
        }

        match control_rx.recv_timeout(interval) {
            Ok(ControlMessage::Stop) => break,
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    debug!(sent, "watch worker stopped");
}
