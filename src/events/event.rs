//! # Events emitted by workers.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: run, pause, resume, stop, cancellation
//! - **Registry events**: pub/sub subscription changes
//! - **Failure events**: handler errors and panics
//!
//! ## Ordering guarantees
//! Each event has a process-wide unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order across workers.
//!
//! ## Example
//! ```rust
//! use workerkit::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::HandlerFailed, "ingest")
//!     .with_handler("parse")
//!     .with_reason("bad input");
//!
//! assert_eq!(ev.kind, EventKind::HandlerFailed);
//! assert_eq!(&*ev.worker, "ingest");
//! assert_eq!(ev.reason.as_deref(), Some("bad input"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of worker events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle events ===
    /// `run` moved the worker from Stopped to Running.
    ///
    /// Sets: `generation`
    WorkerStarted,

    /// `pause` moved the worker from Running to Paused.
    WorkerPaused,

    /// `resume` moved the worker from Paused to Running.
    WorkerResumed,

    /// `stop` moved the worker from Running to Stopped.
    ///
    /// Sets: `generation`
    WorkerStopped,

    /// The cancellation token fired; the worker is Stopped.
    ///
    /// Sets: `generation`
    WorkerCancelled,

    // === Registry events ===
    /// A pub/sub handler was registered.
    ///
    /// Sets: `subscription`, `handler`
    Subscribed,

    /// A pub/sub handler was removed.
    ///
    /// Sets: `subscription`
    Unsubscribed,

    // === Failure events ===
    /// A handler returned an error.
    ///
    /// Sets: `handler`, `reason`, `subscription` (pub/sub only)
    HandlerFailed,

    /// A handler panicked; the panic was contained.
    ///
    /// Sets: `handler`, `reason` (panic message), `subscription` (pub/sub only)
    HandlerPanicked,
}

impl EventKind {
    /// Returns `true` for the failure category.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, EventKind::HandlerFailed | EventKind::HandlerPanicked)
    }
}

/// Worker event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the worker that emitted the event.
    pub worker: Arc<str>,
    /// Name of the handler involved, if any.
    pub handler: Option<Arc<str>>,
    /// Subscription id (pub/sub workers).
    pub subscription: Option<u64>,
    /// Run generation the event belongs to.
    pub generation: Option<u64>,
    /// Human-readable reason (error message, panic payload).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind, worker: impl Into<Arc<str>>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: worker.into(),
            handler: None,
            subscription: None,
            generation: None,
            reason: None,
        }
    }

    /// Attaches a handler name.
    #[inline]
    pub fn with_handler(mut self, name: impl Into<Arc<str>>) -> Self {
        self.handler = Some(name.into());
        self
    }

    /// Attaches a subscription id.
    #[inline]
    pub fn with_subscription(mut self, id: u64) -> Self {
        self.subscription = Some(id);
        self
    }

    /// Attaches a run generation.
    #[inline]
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::WorkerStarted, "w");
        let b = Event::new(EventKind::WorkerStopped, "w");
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_failure_category() {
        assert!(EventKind::HandlerFailed.is_failure());
        assert!(EventKind::HandlerPanicked.is_failure());
        assert!(!EventKind::WorkerPaused.is_failure());
    }

    #[test]
    fn test_builders_fill_fields() {
        let ev = Event::new(EventKind::Subscribed, "bus")
            .with_subscription(7)
            .with_handler("audit")
            .with_generation(2);
        assert_eq!(ev.subscription, Some(7));
        assert_eq!(ev.handler.as_deref(), Some("audit"));
        assert_eq!(ev.generation, Some(2));
        assert!(ev.reason.is_none());
    }
}
