//! # LogWriter: events to `tracing`
//!
//! A minimal observer forwarding every [`Event`] to the `tracing` pipeline.
//! Lifecycle events go out at `info`, registry events at `debug`, failures at
//! `warn`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO  workerkit::observers::log: worker started worker="ingest" generation=1
//! WARN  workerkit::observers::log: handler failed worker="ingest" handler="parse" reason="bad input"
//! INFO  workerkit::observers::log: worker stopped worker="ingest" generation=1
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::observers::Observe;

/// Event writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let worker = &*e.worker;
        match e.kind {
            EventKind::WorkerStarted => {
                info!(worker, generation = e.generation, "worker started");
            }
            EventKind::WorkerPaused => {
                info!(worker, "worker paused");
            }
            EventKind::WorkerResumed => {
                info!(worker, "worker resumed");
            }
            EventKind::WorkerStopped => {
                info!(worker, generation = e.generation, "worker stopped");
            }
            EventKind::WorkerCancelled => {
                info!(worker, generation = e.generation, "worker cancelled");
            }
            EventKind::Subscribed => {
                debug!(
                    worker,
                    subscription = e.subscription,
                    handler = e.handler.as_deref(),
                    "subscribed"
                );
            }
            EventKind::Unsubscribed => {
                debug!(worker, subscription = e.subscription, "unsubscribed");
            }
            EventKind::HandlerFailed => {
                warn!(
                    worker,
                    handler = e.handler.as_deref(),
                    subscription = e.subscription,
                    reason = e.reason.as_deref(),
                    "handler failed"
                );
            }
            EventKind::HandlerPanicked => {
                warn!(
                    worker,
                    handler = e.handler.as_deref(),
                    subscription = e.subscription,
                    reason = e.reason.as_deref(),
                    "handler panicked"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
