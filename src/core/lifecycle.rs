//! # Lifecycle state machine shared by all workers.
//!
//! [`Lifecycle`] owns the [`Status`] of one worker together with everything
//! that must change atomically with it: the run generation, the single-slot stop
//! signal of the current run, and the per-run session (for the event worker, the
//! hand-off sender).
//!
//! ## Transitions
//! ```text
//! start()   Stopped ─► Running            (Running/Paused: no-op, returns None)
//! pause()   Running ─► Paused             (else NotRunning)
//! resume()  Paused  ─► Running            (else NotPaused)
//! stop()    Running ─► Stopped + signal   (else NotRunning)
//! retire()  Running/Paused ─► Stopped     (loop exit on cancellation, same generation only)
//! ```
//!
//! ## Rules
//! - Every read that drives a decision and every write happen under one lock
//! - A failed transition changes nothing
//! - Each successful `start` bumps the generation; a loop can only retire its own run
//! - The gate serializes loops: a new run's loop waits for the previous one to exit
//! - Every loop reports its exit; `stopped()` waits for the loop of the latest run

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, oneshot, watch};
use tracing::debug;

use crate::core::status::Status;
use crate::error::WorkerError;
use crate::events::{Bus, Event, EventKind};

/// Everything guarded by the lifecycle lock.
struct State<S> {
    status: Status,
    generation: u64,
    stop: Option<oneshot::Sender<()>>,
    session: Option<S>,
}

/// Admission to the loop gate.
pub(crate) enum Gate {
    /// Gate was free at `start`; the new loop already holds it.
    Held(OwnedMutexGuard<()>),
    /// A previous loop is still draining; wait for it.
    Queued(Arc<AsyncMutex<()>>),
}

impl Gate {
    pub async fn enter(self) -> OwnedMutexGuard<()> {
        match self {
            Gate::Held(guard) => guard,
            Gate::Queued(gate) => gate.lock_owned().await,
        }
    }
}

/// Handed to the loop spawned by a successful [`Lifecycle::start`].
pub(crate) struct Ticket {
    pub generation: u64,
    pub stop: oneshot::Receiver<()>,
    pub gate: Gate,
}

/// Status, stop signal and per-run session of one worker.
pub(crate) struct Lifecycle<S> {
    name: Arc<str>,
    bus: Bus,
    state: Mutex<State<S>>,
    gate: Arc<AsyncMutex<()>>,
    /// Highest generation whose loop has exited.
    exited: watch::Sender<u64>,
}

impl<S> Lifecycle<S> {
    pub fn new(name: Arc<str>, bus: Bus) -> Self {
        Self {
            name,
            bus,
            state: Mutex::new(State {
                status: Status::Stopped,
                generation: 0,
                stop: None,
                session: None,
            }),
            gate: Arc::new(AsyncMutex::new(())),
            exited: watch::Sender::new(0),
        }
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// Current status (informational).
    pub fn status(&self) -> Status {
        self.state.lock().status
    }

    /// Stopped → Running. Returns `None` (and drops `session`) if a run is already active.
    pub fn start(&self, session: S) -> Option<Ticket> {
        let mut st = self.state.lock();
        if st.status != Status::Stopped {
            debug!(worker = %self.name, status = %st.status, "run ignored, worker already active");
            return None;
        }

        let (tx, rx) = oneshot::channel();
        st.generation += 1;
        st.status = Status::Running;
        st.stop = Some(tx);
        st.session = Some(session);

        let gate = match Arc::clone(&self.gate).try_lock_owned() {
            Ok(guard) => Gate::Held(guard),
            Err(_) => Gate::Queued(Arc::clone(&self.gate)),
        };

        debug!(worker = %self.name, generation = st.generation, "worker started");
        self.bus.publish(
            Event::new(EventKind::WorkerStarted, Arc::clone(&self.name))
                .with_generation(st.generation),
        );

        Some(Ticket {
            generation: st.generation,
            stop: rx,
            gate,
        })
    }

    /// Running → Paused.
    pub fn pause(&self) -> Result<(), WorkerError> {
        let mut st = self.state.lock();
        if st.status != Status::Running {
            return Err(WorkerError::NotRunning);
        }
        st.status = Status::Paused;

        debug!(worker = %self.name, "worker paused");
        self.bus
            .publish(Event::new(EventKind::WorkerPaused, Arc::clone(&self.name)));
        Ok(())
    }

    /// Paused → Running.
    pub fn resume(&self) -> Result<(), WorkerError> {
        let mut st = self.state.lock();
        if st.status != Status::Paused {
            return Err(WorkerError::NotPaused);
        }
        st.status = Status::Running;

        debug!(worker = %self.name, "worker resumed");
        self.bus
            .publish(Event::new(EventKind::WorkerResumed, Arc::clone(&self.name)));
        Ok(())
    }

    /// Running → Stopped, signalling the loop of the current run.
    pub fn stop(&self) -> Result<(), WorkerError> {
        let mut st = self.state.lock();
        if st.status != Status::Running {
            return Err(WorkerError::NotRunning);
        }
        st.status = Status::Stopped;
        st.session = None;
        if let Some(tx) = st.stop.take() {
            // The receiver lives in the loop; oneshot send never blocks.
            let _ = tx.send(());
        }

        debug!(worker = %self.name, generation = st.generation, "worker stopped");
        self.bus.publish(
            Event::new(EventKind::WorkerStopped, Arc::clone(&self.name))
                .with_generation(st.generation),
        );
        Ok(())
    }

    /// Moves the worker to Stopped on behalf of an exiting loop.
    ///
    /// No-op (returns `false`) if `generation` is no longer current or the
    /// worker is already stopped.
    pub fn retire(&self, generation: u64) -> bool {
        let mut st = self.state.lock();
        if st.generation != generation || st.status == Status::Stopped {
            return false;
        }
        st.status = Status::Stopped;
        st.session = None;
        st.stop = None;

        debug!(worker = %self.name, generation, "worker cancelled");
        self.bus.publish(
            Event::new(EventKind::WorkerCancelled, Arc::clone(&self.name))
                .with_generation(generation),
        );
        true
    }

    /// Returns `true` if the worker is Running within run `generation`.
    pub fn accepts(&self, generation: u64) -> bool {
        let st = self.state.lock();
        st.status == Status::Running && st.generation == generation
    }

    /// Records that the loop of run `generation` has exited.
    pub fn mark_exited(&self, generation: u64) {
        self.exited.send_modify(|last| *last = (*last).max(generation));
    }

    /// Waits until the loop of the latest run has exited.
    ///
    /// Returns immediately if the worker never ran.
    pub async fn stopped(&self) {
        let mut rx = self.exited.subscribe();
        loop {
            let current = self.state.lock().generation;
            if *rx.borrow_and_update() >= current {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl<S: Clone> Lifecycle<S> {
    /// Returns a clone of the current session if the worker is Running.
    pub fn running_session(&self) -> Result<S, WorkerError> {
        let st = self.state.lock();
        match (&st.status, &st.session) {
            (Status::Running, Some(session)) => Ok(session.clone()),
            _ => Err(WorkerError::NotRunning),
        }
    }
}
