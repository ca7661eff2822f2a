use super::{BatchError, BatchOptions, BatchResult, BatchSummary, StopReason};
use crate::config::EndpointSpec;
use crate::probe_engine::EndpointProbe;
use crossbeam_channel::{Receiver, Sender, select};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

/// One-shot cancellation shared by the dispatcher, the workers and the
/// collector. Tripping drops the notifier so blocked selects wake up.
///
/// The reason lock also orders result delivery against the trip: a result is
/// either on the channel before the stop or never sent at all.
struct StopSignal {
    stopped: AtomicBool,
    reason: Mutex<Option<StopReason>>,
    notify: Mutex<Option<Sender<()>>>,
}

impl StopSignal {
    fn new() -> (Arc<Self>, Receiver<()>) {
        let (notify_tx, notify_rx) = crossbeam_channel::bounded(0);
        let signal = Self {
            stopped: AtomicBool::new(false),
            reason: Mutex::new(None),
            notify: Mutex::new(Some(notify_tx)),
        };
        (Arc::new(signal), notify_rx)
    }

    fn lock_reason(&self) -> MutexGuard<'_, Option<StopReason>> {
        self.reason.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True only for the caller that performed the transition.
    fn trip(&self, reason: StopReason) -> bool {
        let mut slot = self.lock_reason();
        self.trip_locked(&mut slot, reason)
    }

    fn trip_locked(&self, slot: &mut Option<StopReason>, reason: StopReason) -> bool {
        if slot.is_some() {
            return false;
        }
        *slot = Some(reason);
        self.stopped.store(true, Ordering::Release);
        if let Ok(mut notify) = self.notify.lock() {
            notify.take();
        }
        info!(?reason, "batch stopped admitting endpoints");
        true
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    fn reason(&self) -> Option<StopReason> {
        *self.lock_reason()
    }

    /// Sends `result` unless the batch already stopped. With fail-fast on, a
    /// failed result trips the stop and is the last result ever sent.
    fn deliver(
        &self,
        result: BatchResult,
        fail_fast: bool,
        results_tx: &Sender<BatchResult>,
    ) -> bool {
        let mut slot = self.lock_reason();
        if slot.is_some() {
            debug!(endpoint = %result.name, "result discarded after stop");
            return false;
        }
        if fail_fast && !result.success {
            self.trip_locked(&mut slot, StopReason::FailFast);
        }
        results_tx.send(result).is_ok()
    }
}

/// Slot in the admission gate, handed back on drop.
struct Permit(Receiver<()>);

impl Drop for Permit {
    fn drop(&mut self) {
        let _ = self.0.try_recv();
    }
}

fn deadline_rx(deadline: Option<Instant>) -> Receiver<Instant> {
    match deadline {
        Some(at) => crossbeam_channel::at(at),
        None => crossbeam_channel::never(),
    }
}

pub fn run_batch<P>(
    endpoints: &[EndpointSpec],
    options: &BatchOptions,
    probe: P,
) -> Result<BatchSummary, BatchError>
where
    P: EndpointProbe + 'static,
{
    run_batch_with(endpoints, options, probe, |_| {})
}

/// Probes every endpoint with at most `options.concurrency` requests in
/// flight. `on_result` sees each counted result as it is collected.
///
/// Results are kept in arrival order. When the deadline passes the summary
/// is returned right away; probes still running finish on their own threads
/// and their results are dropped.
pub fn run_batch_with<P, F>(
    endpoints: &[EndpointSpec],
    options: &BatchOptions,
    probe: P,
    mut on_result: F,
) -> Result<BatchSummary, BatchError>
where
    P: EndpointProbe + 'static,
    F: FnMut(&BatchResult),
{
    if endpoints.is_empty() {
        return Err(BatchError::NoEndpoints);
    }
    if options.concurrency == 0 {
        return Err(BatchError::InvalidConcurrency {
            value: options.concurrency,
        });
    }

    let started = Instant::now();
    let deadline = options.max_time.map(|limit| started + limit);
    let (stop, stop_rx) = StopSignal::new();
    let (results_tx, results_rx) = crossbeam_channel::unbounded();

    debug!(
        endpoints = endpoints.len(),
        concurrency = options.concurrency,
        fail_fast = options.fail_fast,
        max_time = ?options.max_time,
        "starting batch"
    );

    let dispatcher = Dispatcher {
        endpoints: endpoints.to_vec(),
        options: options.clone(),
        probe: Arc::new(probe),
        stop: Arc::clone(&stop),
        stop_rx,
        deadline,
        results_tx,
    };
    thread::spawn(move || dispatcher.run());

    let mut summary = BatchSummary::new();
    summary.planned = endpoints.len();
    let expired = deadline_rx(deadline);

    loop {
        select! {
            recv(results_rx) -> message => match message {
                Ok(result) => {
                    if stop.reason() == Some(StopReason::DeadlineExceeded) {
                        break;
                    }
                    on_result(&result);
                    summary.add_result(result);
                }
                // every worker and the dispatcher are done
                Err(_) => break,
            },
            recv(expired) -> _ => {
                stop.trip(StopReason::DeadlineExceeded);
                break;
            }
        }
    }

    summary.stop_reason = stop.reason();
    summary.total_time = started.elapsed();
    debug!(
        total = summary.total,
        failed = summary.failed,
        untested = summary.untested(),
        "batch finished"
    );
    Ok(summary)
}

struct Dispatcher<P> {
    endpoints: Vec<EndpointSpec>,
    options: BatchOptions,
    probe: Arc<P>,
    stop: Arc<StopSignal>,
    stop_rx: Receiver<()>,
    deadline: Option<Instant>,
    results_tx: Sender<BatchResult>,
}

impl<P> Dispatcher<P>
where
    P: EndpointProbe + 'static,
{
    fn run(self) {
        let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(self.options.concurrency);
        let expired = deadline_rx(self.deadline);

        for (index, endpoint) in self.endpoints.iter().enumerate() {
            if self.stop.is_stopped() {
                self.log_skipped(index);
                break;
            }

            select! {
                send(gate_tx, ()) -> sent => {
                    if sent.is_err() {
                        break;
                    }
                }
                recv(self.stop_rx) -> _ => {
                    self.log_skipped(index);
                    break;
                }
                recv(expired) -> _ => {
                    self.stop.trip(StopReason::DeadlineExceeded);
                    self.log_skipped(index);
                    break;
                }
            }

            let permit = Permit(gate_rx.clone());
            // stop may have tripped while we waited for the slot
            if self.stop.is_stopped() {
                drop(permit);
                self.log_skipped(index);
                break;
            }

            debug!(endpoint = %endpoint.name, url = %endpoint.url, "dispatching");
            let endpoint = endpoint.clone();
            let probe = Arc::clone(&self.probe);
            let stop = Arc::clone(&self.stop);
            let results_tx = self.results_tx.clone();
            let timeout = endpoint.effective_timeout(self.options.default_timeout);
            let fail_fast = self.options.fail_fast;

            thread::spawn(move || {
                let outcome = probe.probe(&endpoint, timeout);
                let result = BatchResult::evaluate(&endpoint, outcome);
                stop.deliver(result, fail_fast, &results_tx);
                // released only after delivery so a single lane sees the stop
                drop(permit);
            });
        }
    }

    fn log_skipped(&self, index: usize) {
        let skipped = self.endpoints.len() - index;
        debug!(skipped, "endpoints not dispatched");
    }
}
