//! Background worker thread — calculations run here, off the render loop.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The
//! "calculating" delay is an explicit wait inside the worker that polls the
//! shared cancel flag (Esc) and the command queue. Any command that arrives
//! during the wait supersedes the request being delayed, so a burst of
//! triggers costs one latency period, not one per trigger. The evaluator
//! itself never sees the delay.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use capmlab_core::{calculate, CapmInputs, CapmReport, Settings};

/// Granularity of the cancellable wait.
const POLL_SLICE: Duration = Duration::from_millis(20);

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Calculate {
        request_id: u64,
        inputs: CapmInputs,
        settings: Settings,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    Calculated {
        request_id: u64,
        report: Box<CapmReport>,
    },
    Cancelled {
        request_id: u64,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    cancel: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("capmlab-worker".into())
        .spawn(move || {
            worker_loop(rx, tx, cancel);
        })
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>, cancel: Arc<AtomicBool>) {
    let mut next = rx.recv().ok();
    while let Some(cmd) = next.take() {
        match cmd {
            WorkerCommand::Shutdown => break,
            WorkerCommand::Calculate {
                request_id,
                inputs,
                settings,
            } => {
                cancel.store(false, Ordering::Relaxed);
                next = run_calculation(request_id, &inputs, &settings, &rx, &tx, &cancel)
                    .or_else(|| rx.recv().ok());
            }
        }
    }
    tracing::debug!("worker stopped");
}

/// Outcome of the simulated latency.
#[derive(Debug)]
enum Wait {
    Elapsed,
    Cancelled,
    /// A newer command arrived; the current request is stale.
    Superseded(WorkerCommand),
    Disconnected,
}

/// Run one request. Returns a command that arrived during the wait and
/// replaced this request, if any.
fn run_calculation(
    request_id: u64,
    inputs: &CapmInputs,
    settings: &Settings,
    rx: &Receiver<WorkerCommand>,
    tx: &Sender<WorkerResponse>,
    cancel: &AtomicBool,
) -> Option<WorkerCommand> {
    let latency = Duration::from_millis(settings.simulated_latency_ms);
    match wait_for_latency(latency, rx, cancel) {
        Wait::Elapsed => {
            let report = calculate(inputs, settings);
            tracing::info!(request_id, display = %report.display, "calculation complete");
            let _ = tx.send(WorkerResponse::Calculated {
                request_id,
                report: Box::new(report),
            });
            None
        }
        Wait::Cancelled => {
            tracing::info!(request_id, "calculation cancelled");
            let _ = tx.send(WorkerResponse::Cancelled { request_id });
            None
        }
        Wait::Superseded(newer) => {
            tracing::info!(request_id, "calculation superseded");
            let _ = tx.send(WorkerResponse::Cancelled { request_id });
            Some(newer)
        }
        Wait::Disconnected => Some(WorkerCommand::Shutdown),
    }
}

/// Wait out `latency` while watching the cancel flag and the command queue.
fn wait_for_latency(
    latency: Duration,
    rx: &Receiver<WorkerCommand>,
    cancel: &AtomicBool,
) -> Wait {
    let deadline = Instant::now() + latency;
    loop {
        if cancel.load(Ordering::Relaxed) {
            return Wait::Cancelled;
        }
        let now = Instant::now();
        if now >= deadline {
            return Wait::Elapsed;
        }
        match rx.recv_timeout(POLL_SLICE.min(deadline - now)) {
            Ok(cmd) => return Wait::Superseded(cmd),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Wait::Disconnected,
        }
    }
}
