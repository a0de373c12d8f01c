//! Periodic step trigger
//!
//! The driver is the only thing besides the caller that touches the engine,
//! and its only capability is calling `step`. Both the timer thread and
//! manual steps go through the engine mutex, so two steps never interleave.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{StepResult, TourEngine};

/// Engine shared between the caller and the driver thread.
pub type SharedEngine = Arc<Mutex<TourEngine>>;

/// Callback invoked after every step the driver performs.
pub type StepObserver = Arc<dyn Fn(&StepResult) + Send + Sync>;

/// Lock the engine, mapping a poisoned mutex to an application error.
pub fn lock_engine(engine: &SharedEngine) -> ApplicationResult<MutexGuard<'_, TourEngine>> {
    engine.lock().map_err(|_| ApplicationError::EngineUnavailable)
}

struct Worker {
    stop_tx: Sender<()>,
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Fires `step` on a fixed period until the engine reports nothing left to do.
pub struct StepDriver {
    engine: SharedEngine,
    interval: Duration,
    observer: Option<StepObserver>,
    worker: Option<Worker>,
}

impl StepDriver {
    pub fn new(engine: SharedEngine, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            observer: None,
            worker: None,
        }
    }

    pub fn with_observer(mut self, observer: StepObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|w| w.running.load(Ordering::SeqCst))
    }

    /// Start periodic stepping. The first step fires immediately.
    ///
    /// No-op while already running. The thread stops by itself on
    /// `CycleCompleted` or `NoOp`.
    #[instrument(level = "debug", skip(self))]
    pub fn start_auto(&mut self) -> ApplicationResult<()> {
        if self.is_running() {
            debug!("step driver already running");
            return Ok(());
        }
        // reap a worker that finished on its own
        self.stop_auto();

        let (stop_tx, stop_rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let engine = Arc::clone(&self.engine);
        let observer = self.observer.clone();
        let interval = self.interval;

        let handle = thread::Builder::new()
            .name("step-driver".to_string())
            .spawn(move || {
                loop {
                    let result = match engine.lock() {
                        Ok(mut engine) => engine.step(),
                        Err(_) => {
                            error!("tour engine poisoned, stopping step driver");
                            break;
                        }
                    };
                    if let Some(observer) = &observer {
                        observer(&result);
                    }
                    if result.is_terminal() {
                        debug!(?result, "auto stepping finished");
                        break;
                    }
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                flag.store(false, Ordering::SeqCst);
            })
            .map_err(|source| ApplicationError::Driver {
                context: "spawn step thread".to_string(),
                source,
            })?;

        self.worker = Some(Worker {
            stop_tx,
            running,
            handle,
        });
        Ok(())
    }

    /// Cancel periodic stepping. Safe to call at any time, including before
    /// `start_auto`. Waits for an in-flight step to finish.
    #[instrument(level = "debug", skip(self))]
    pub fn stop_auto(&mut self) {
        if let Some(worker) = self.worker.take() {
            // the thread may already have exited and dropped its receiver
            let _ = worker.stop_tx.send(());
            if worker.handle.join().is_err() {
                warn!("step driver thread panicked");
            }
        }
    }

    /// Block until the running driver stops by itself.
    pub fn wait(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.handle.join().is_err() {
                warn!("step driver thread panicked");
            }
        }
    }

    /// Single manual step, independent of the timer.
    #[instrument(level = "debug", skip(self))]
    pub fn step_once(&self) -> ApplicationResult<StepResult> {
        let result = lock_engine(&self.engine)?.step();
        if let Some(observer) = &self.observer {
            observer(&result);
        }
        Ok(result)
    }
}

impl Drop for StepDriver {
    fn drop(&mut self) {
        self.stop_auto();
    }
}
