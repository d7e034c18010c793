//! # Worker builder.
//!
//! [`WorkerBuilder`] collects a [`WorkerConfig`] and a set of observers, then
//! builds any of the three worker variants:
//!
//! ```text
//! WorkerBuilder::new(cfg)
//!     .name("ingest")
//!     .observer(Arc::new(MyObserver))
//!     .event(handler)        ─► EventWorker<T>
//!     .pubsub()              ─► PubSubWorker<T>
//!     .ticker(period, h)     ─► TickerWorker
//! ```

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::WorkerConfig;
use crate::handlers::HandlerRef;
use crate::observers::Observe;
use crate::workers::{EventWorker, PubSubWorker, TickerWorker};

/// Builder for constructing workers with custom configuration and observers.
#[derive(Default)]
pub struct WorkerBuilder {
    cfg: WorkerConfig,
    observers: Vec<Arc<dyn Observe>>,
}

impl WorkerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: WorkerConfig) -> Self {
        Self {
            cfg,
            observers: Vec::new(),
        }
    }

    /// Sets the worker name.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.cfg.name = name.into();
        self
    }

    /// Sets the pub/sub fan-out limit (`0` = `2 × available_parallelism`).
    pub fn max_parallel(mut self, n: usize) -> Self {
        self.cfg.max_parallel = n;
        self
    }

    /// Sets the event bus capacity.
    pub fn bus_capacity(mut self, n: usize) -> Self {
        self.cfg.bus_capacity = n;
        self
    }

    /// Adds one observer.
    pub fn observer(mut self, observer: Arc<dyn Observe>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Replaces the observer list.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Builds an event worker around `handler`.
    pub fn event<T: Send + 'static>(self, handler: HandlerRef<T>) -> EventWorker<T> {
        EventWorker::build(&self.cfg, self.observers, handler)
    }

    /// Builds a pub/sub worker with an empty registry.
    pub fn pubsub<T: Clone + Send + 'static>(self) -> PubSubWorker<T> {
        PubSubWorker::build(&self.cfg, self.observers)
    }

    /// Builds a ticker worker firing `handler` every `period`.
    pub fn ticker(self, period: Duration, handler: HandlerRef<()>) -> TickerWorker {
        TickerWorker::build(&self.cfg, self.observers, period, handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Status;
    use crate::handlers::HandlerFn;
    use crate::workers::Worker;

    #[test]
    fn test_settings_reach_the_worker() {
        let w = WorkerBuilder::default()
            .name("named")
            .max_parallel(2)
            .bus_capacity(8)
            .event(HandlerFn::arc("noop", |_: u8| async {
                Ok::<_, anyhow::Error>(())
            }));

        assert_eq!(w.name(), "named");
        assert_eq!(w.status(), Status::Stopped);
    }

    #[test]
    fn test_construction_needs_no_runtime() {
        let ps: PubSubWorker<String> = WorkerBuilder::new(WorkerConfig::default()).pubsub();
        let tk = WorkerBuilder::default().ticker(
            Duration::from_secs(1),
            HandlerFn::arc("tick", |_: ()| async { Ok::<_, anyhow::Error>(()) }),
        );
        assert_eq!(ps.name(), "worker");
        assert_eq!(tk.status(), Status::Stopped);
    }
}
