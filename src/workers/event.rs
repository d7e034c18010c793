//! # Event worker.
//!
//! Processes values handed over by [`EventWorker::invoke`] one at a time, in
//! acceptance order, on the worker's loop.
//!
//! ```text
//! invoke(data) ── running_session()? ──► mpsc(1) ──► loop: ack ─► handler(data)
//!      ▲                                                  │
//!      └──────────── Ok(()) once accepted ◄───────────────┘
//! ```
//!
//! ## Rules
//! - `invoke` is rejected with `NotRunning` unless the worker is Running, checked
//!   once at submission and again when the loop takes the value
//! - `invoke` completes when the loop accepts the value, not when the handler finishes
//! - A value the loop never accepted (pause, stop, cancellation) is dropped and
//!   its `invoke` returns `NotRunning`; it never leaks into a later run

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::core::{Lifecycle, Reporter, Shared, Source, Status, WorkerConfig};
use crate::error::WorkerError;
use crate::handlers::{HandlerFn, HandlerRef, HandlerResult};
use crate::observers::Observe;
use crate::workers::Worker;

/// One value in transit, with the acceptance signal for its `invoke`.
struct Envelope<T> {
    data: T,
    accepted: oneshot::Sender<()>,
}

type Session<T> = mpsc::Sender<Envelope<T>>;

struct Inner<T> {
    shared: Shared<Session<T>>,
    handler: HandlerRef<T>,
}

/// Worker invoking one handler per value submitted through [`invoke`](EventWorker::invoke).
pub struct EventWorker<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for EventWorker<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + 'static> EventWorker<T> {
    /// Creates a worker with the default configuration.
    pub fn new(handler: HandlerRef<T>) -> Self {
        Self::build(&WorkerConfig::default(), Vec::new(), handler)
    }

    /// Creates a worker named `name` around a closure (the handler gets the same name).
    pub fn from_fn<F, Fut>(name: &'static str, f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let cfg = WorkerConfig {
            name: name.into(),
            ..WorkerConfig::default()
        };
        Self::build(&cfg, Vec::new(), HandlerFn::arc(name, f))
    }

    pub(crate) fn build(
        cfg: &WorkerConfig,
        observers: Vec<Arc<dyn Observe>>,
        handler: HandlerRef<T>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                shared: Shared::new(cfg, observers),
                handler,
            }),
        }
    }

    /// Hands `data` to the loop and waits until it has been accepted.
    ///
    /// # Errors
    /// [`WorkerError::NotRunning`] if the worker is not Running when `invoke` is
    /// called or when the loop takes the value, or if the loop exits before
    /// taking it.
    pub async fn invoke(&self, data: T) -> Result<(), WorkerError> {
        let session = self.inner.shared.lifecycle.running_session()?;
        let (accepted, ack) = oneshot::channel();

        session
            .send(Envelope { data, accepted })
            .await
            .map_err(|_| WorkerError::NotRunning)?;
        ack.await.map_err(|_| WorkerError::NotRunning)
    }
}

#[async_trait]
impl<T: Send + 'static> Worker for EventWorker<T> {
    fn name(&self) -> &str {
        self.inner.shared.lifecycle.name()
    }

    fn status(&self) -> Status {
        self.inner.shared.lifecycle.status()
    }

    fn run(&self, token: CancellationToken) {
        let (tx, rx) = mpsc::channel(1);
        let shared = &self.inner.shared;
        shared.launch(token, tx, |generation| EventSource {
            rx,
            generation,
            lifecycle: Arc::clone(&shared.lifecycle),
            handler: Arc::clone(&self.inner.handler),
            reporter: shared.reporter.clone(),
        });
    }

    fn pause(&self) -> Result<(), WorkerError> {
        self.inner.shared.lifecycle.pause()
    }

    fn resume(&self) -> Result<(), WorkerError> {
        self.inner.shared.lifecycle.resume()
    }

    fn stop(&self) -> Result<(), WorkerError> {
        self.inner.shared.lifecycle.stop()
    }

    async fn stopped(&self) {
        self.inner.shared.lifecycle.stopped().await;
    }
}

struct EventSource<T> {
    rx: mpsc::Receiver<Envelope<T>>,
    generation: u64,
    lifecycle: Arc<Lifecycle<Session<T>>>,
    handler: HandlerRef<T>,
    reporter: Reporter,
}

#[async_trait]
impl<T: Send + 'static> Source for EventSource<T> {
    type Item = Envelope<T>;

    async fn next(&mut self) -> Option<Envelope<T>> {
        self.rx.recv().await
    }

    async fn dispatch(&mut self, env: Envelope<T>) {
        if !self.lifecycle.accepts(self.generation) {
            // Dropping the envelope fails the pending `invoke` with `NotRunning`.
            trace!(worker = %self.lifecycle.name(), "value rejected, worker not running");
            return;
        }
        // The caller may have dropped its `invoke` future; the value is still processed.
        let _ = env.accepted.send(());
        self.reporter.invoke(&*self.handler, env.data, None).await;
    }
}
