//! # Isolated handler invocation.
//!
//! Every handler call in the crate goes through [`Reporter::invoke`], which is
//! the isolation boundary between caller-supplied code and the worker:
//!
//! ```text
//! handler.call(data) ──► await ──► Ok(())  → Outcome::Done
//!        │                  │
//!        │                  ├──► Err(e)   → warn!  + HandlerFailed   → Outcome::Failed
//!        │                  └──► panic    → error! + HandlerPanicked → Outcome::Panicked
//!        └──► panic (building the future) → error! + HandlerPanicked → Outcome::Panicked
//! ```
//!
//! ## Rules
//! - Never propagates a failure to the caller of `invoke`/`publish`
//! - Never stops the dispatching loop
//! - Always reports (tracing + bus)
//!
//! **Warning**: `AssertUnwindSafe` is used; a handler panicking while holding a
//! lock on shared state may leave that state inconsistent.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, warn};

use crate::events::{Bus, Event, EventKind};
use crate::handlers::Handler;

/// Result of one isolated invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Done,
    Failed,
    Panicked,
}

/// Invokes handlers on behalf of one worker and reports their failures.
#[derive(Clone, Debug)]
pub(crate) struct Reporter {
    worker: Arc<str>,
    bus: Bus,
}

impl Reporter {
    pub fn new(worker: Arc<str>, bus: Bus) -> Self {
        Self { worker, bus }
    }

    pub fn worker(&self) -> &Arc<str> {
        &self.worker
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Runs `handler` on `data` to completion, containing errors and panics.
    pub async fn invoke<T: 'static>(
        &self,
        handler: &dyn Handler<T>,
        data: T,
        subscription: Option<u64>,
    ) -> Outcome {
        let fut = match panic::catch_unwind(AssertUnwindSafe(|| handler.call(data))) {
            Ok(fut) => fut,
            Err(payload) => {
                self.panicked(handler.name(), subscription, panic_message(payload.as_ref()));
                return Outcome::Panicked;
            }
        };

        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(())) => Outcome::Done,
            Ok(Err(err)) => {
                let reason = format!("{err:#}");
                warn!(
                    worker = %self.worker,
                    handler = handler.name(),
                    subscription = subscription,
                    error = %reason,
                    "handler failed"
                );
                let ev = Event::new(EventKind::HandlerFailed, Arc::clone(&self.worker))
                    .with_handler(handler.name())
                    .with_reason(reason);
                self.bus.publish(with_subscription(ev, subscription));
                Outcome::Failed
            }
            Err(payload) => {
                self.panicked(handler.name(), subscription, panic_message(payload.as_ref()));
                Outcome::Panicked
            }
        }
    }

    fn panicked(&self, handler: &str, subscription: Option<u64>, info: String) {
        error!(
            worker = %self.worker,
            handler = handler,
            subscription = subscription,
            panic = %info,
            "handler panicked"
        );
        let ev = Event::new(EventKind::HandlerPanicked, Arc::clone(&self.worker))
            .with_handler(handler)
            .with_reason(info);
        self.bus.publish(with_subscription(ev, subscription));
    }
}

fn with_subscription(ev: Event, subscription: Option<u64>) -> Event {
    match subscription {
        Some(id) => ev.with_subscription(id),
        None => ev,
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
