//! State common to every worker variant: lifecycle, observers and the failure
//! reporter, all wired to one bus.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::config::WorkerConfig;
use crate::core::invoke::Reporter;
use crate::core::lifecycle::Lifecycle;
use crate::core::runner::{self, Source};
use crate::events::{Bus, Event, EventKind};
use crate::observers::{Observe, ObserverSet};

pub(crate) struct Shared<S> {
    pub lifecycle: Arc<Lifecycle<S>>,
    pub reporter: Reporter,
    observers: ObserverSet,
}

impl<S: Send + 'static> Shared<S> {
    pub fn new(cfg: &WorkerConfig, observers: Vec<Arc<dyn Observe>>) -> Self {
        let name: Arc<str> = Arc::from(cfg.name.as_ref());
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            observers: ObserverSet::new(Arc::clone(&name), &bus, observers),
            reporter: Reporter::new(Arc::clone(&name), bus.clone()),
            lifecycle: Arc::new(Lifecycle::new(name, bus)),
        }
    }

    /// Starts a run with `session` and spawns its loop over the source built by `make`.
    ///
    /// `make` receives the run generation and is only called when the worker was
    /// Stopped. Returns whether a run started.
    pub fn launch<X, F>(&self, token: CancellationToken, session: S, make: F) -> bool
    where
        X: Source,
        F: FnOnce(u64) -> X,
    {
        let Some(ticket) = self.lifecycle.start(session) else {
            return false;
        };
        self.observers.start();
        let source = make(ticket.generation);
        runner::spawn(Arc::clone(&self.lifecycle), ticket, token, source);
        true
    }

    /// Publishes a worker-scoped event.
    pub fn publish(&self, ev: Event) {
        self.reporter.bus().publish(ev);
    }

    /// Creates an event stamped with this worker's name.
    pub fn event(&self, kind: EventKind) -> Event {
        Event::new(kind, Arc::clone(self.reporter.worker()))
    }
}
