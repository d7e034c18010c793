//! # Pub/sub worker.
//!
//! Keeps a registry of numbered subscribers and fans every published value out
//! to all of them.
//!
//! ```text
//! publish(data)
//!   ├─ status == Running?          (else NotRunning)
//!   ├─ snapshot = registry.lock().clone()
//!   ├─ for (id, handler) in snapshot:
//!   │     spawn { permit = limiter.acquire(); handler(data.clone()) }
//!   └─ join all                    (barrier)
//! ```
//!
//! ## Rules
//! - `sub`/`unsub` work in every status and never block on a publish in progress
//! - A publish only reaches the subscribers registered when it started
//! - Subscriber failures are isolated; `publish` still returns `Ok(())`
//! - At most `max_parallel` subscriber invocations run at once, across all
//!   concurrent `publish` calls
//! - Dropping a `publish` future aborts its outstanding invocations

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::{Idle, Shared, Status, WorkerConfig};
use crate::error::WorkerError;
use crate::events::EventKind;
use crate::handlers::{HandlerFn, HandlerRef, HandlerResult};
use crate::observers::Observe;
use crate::workers::Worker;

/// Identifier returned by [`PubSubWorker::sub`].
///
/// Ids start at 1, increase strictly and are never reused within a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw id.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Registry<T> {
    last_id: u64,
    handlers: BTreeMap<u64, HandlerRef<T>>,
}

struct Inner<T> {
    shared: Shared<()>,
    registry: Mutex<Registry<T>>,
    limiter: Arc<Semaphore>,
}

/// Worker fanning each published value out to every subscriber.
pub struct PubSubWorker<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for PubSubWorker<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> Default for PubSubWorker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> PubSubWorker<T> {
    /// Creates a worker with the default configuration.
    pub fn new() -> Self {
        Self::build(&WorkerConfig::default(), Vec::new())
    }

    pub(crate) fn build(cfg: &WorkerConfig, observers: Vec<Arc<dyn Observe>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                shared: Shared::new(cfg, observers),
                registry: Mutex::new(Registry {
                    last_id: 0,
                    handlers: BTreeMap::new(),
                }),
                limiter: Arc::new(Semaphore::new(cfg.parallel_limit())),
            }),
        }
    }

    /// Registers `handler` and returns its id. Works in every status.
    pub fn sub(&self, handler: HandlerRef<T>) -> SubscriptionId {
        let name: Arc<str> = Arc::from(handler.name());
        let id = {
            let mut reg = self.inner.registry.lock();
            reg.last_id += 1;
            let id = reg.last_id;
            reg.handlers.insert(id, handler);
            id
        };

        debug!(worker = %self.name(), subscription = id, handler = %name, "subscribed");
        self.inner.shared.publish(
            self.inner
                .shared
                .event(EventKind::Subscribed)
                .with_subscription(id)
                .with_handler(name),
        );
        SubscriptionId(id)
    }

    /// Registers a closure named `name`.
    pub fn sub_fn<F, Fut>(&self, name: &'static str, f: F) -> SubscriptionId
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.sub(HandlerFn::arc(name, f))
    }

    /// Removes the subscriber `id`. Returns whether it was registered.
    pub fn unsub(&self, id: SubscriptionId) -> bool {
        let removed = self.inner.registry.lock().handlers.remove(&id.0).is_some();
        if removed {
            debug!(worker = %self.name(), subscription = id.0, "unsubscribed");
            self.inner.shared.publish(
                self.inner
                    .shared
                    .event(EventKind::Unsubscribed)
                    .with_subscription(id.0),
            );
        }
        removed
    }

    /// Number of registered subscribers.
    pub fn subscribers(&self) -> usize {
        self.inner.registry.lock().handlers.len()
    }

    /// Delivers `data` to every current subscriber and waits for all of them.
    ///
    /// # Errors
    /// [`WorkerError::NotRunning`] unless the worker is Running.
    pub async fn publish(&self, data: T) -> Result<(), WorkerError> {
        if self.inner.shared.lifecycle.status() != Status::Running {
            return Err(WorkerError::NotRunning);
        }

        let snapshot: Vec<(u64, HandlerRef<T>)> = self
            .inner
            .registry
            .lock()
            .handlers
            .iter()
            .map(|(id, h)| (*id, Arc::clone(h)))
            .collect();

        let mut set = JoinSet::new();
        for (id, handler) in snapshot {
            let limiter = Arc::clone(&self.inner.limiter);
            let reporter = self.inner.shared.reporter.clone();
            let data = data.clone();
            set.spawn(async move {
                let Ok(_permit) = limiter.acquire_owned().await else {
                    return;
                };
                reporter.invoke(&*handler, data, Some(id)).await;
            });
        }

        while let Some(res) = set.join_next().await {
            if let Err(err) = res {
                debug!(worker = %self.name(), error = %err, "fan-out task ended abnormally");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Clone + Send + 'static> Worker for PubSubWorker<T> {
    fn name(&self) -> &str {
        self.inner.shared.lifecycle.name()
    }

    fn status(&self) -> Status {
        self.inner.shared.lifecycle.status()
    }

    fn run(&self, token: CancellationToken) {
        self.inner.shared.launch(token, (), |_| Idle);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn counter(w: &PubSubWorker<u32>, hits: &Arc<AtomicUsize>) -> SubscriptionId {
        let hits = Arc::clone(hits);
        w.sub_fn("counter", move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
    }

    #[tokio::test]
    async fn test_publish_rejected_unless_running() {
        let w = PubSubWorker::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        counter(&w, &hits);

        assert_eq!(w.publish(1).await, Err(WorkerError::NotRunning));
        w.run(CancellationToken::new());
        w.pause().unwrap();
        assert_eq!(w.publish(2).await, Err(WorkerError::NotRunning));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_called_once_before_publish_returns() {
        let w = PubSubWorker::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let hits = Arc::clone(&hits);
            w.sub_fn("slow", move |_| {
                let hits = Arc::clone(&hits);
                async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    hits.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            });
        }
        w.run(CancellationToken::new());

        w.publish(7).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_failing_subscriber_is_isolated() {
        let w = PubSubWorker::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        counter(&w, &hits);
        w.sub_fn("error", |_| async { Err::<(), _>(anyhow::anyhow!("refused")) });
        w.sub_fn("panic", |n: u32| async move {
            if n > 0 {
                panic!("subscriber bug");
            }
            Ok(())
        });
        counter(&w, &hits);
        w.run(CancellationToken::new());

        assert_eq!(w.publish(1).await, Ok(()));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unsub_removes_and_reports() {
        let w = PubSubWorker::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let a = counter(&w, &hits);
        counter(&w, &hits);
        assert_eq!(w.subscribers(), 2);

        assert!(w.unsub(a));
        assert!(!w.unsub(a));
        assert_eq!(w.subscribers(), 1);

        w.run(CancellationToken::new());
        w.publish(1).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ids_increase_and_are_not_reused() {
        let w = PubSubWorker::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let a = counter(&w, &hits);
        let b = counter(&w, &hits);
        w.unsub(b);
        let c = counter(&w, &hits);

        assert_eq!(a.get(), 1);
        assert!(b > a);
        assert!(c > b);
        assert_eq!(c.to_string(), "3");
    }

    #[tokio::test]
    async fn test_limiter_of_one_serializes_fan_out() {
        let w = PubSubWorker::<u32>::build(
            &WorkerConfig {
                max_parallel: 1,
                ..WorkerConfig::default()
            },
            Vec::new(),
        );
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        for _ in 0..4 {
            let (active, peak) = (Arc::clone(&active), Arc::clone(&peak));
            w.sub_fn("serial", move |_| {
                let (active, peak) = (Arc::clone(&active), Arc::clone(&peak));
                async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                }
            });
        }
        w.run(CancellationToken::new());

        w.publish(0).await.unwrap();
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_subscriber_added_during_publish_misses_it() {
        let w = PubSubWorker::<u32>::new();
        let late_hits = Arc::new(AtomicUsize::new(0));

        let (w2, late) = (w.clone(), Arc::clone(&late_hits));
        w.sub_fn("registrar", move |_| {
            let (w2, late) = (w2.clone(), Arc::clone(&late));
            async move {
                counter(&w2, &late);
                Ok(())
            }
        });
        w.run(CancellationToken::new());

        w.publish(1).await.unwrap();
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);
        assert_eq!(w.subscribers(), 2);
    }

    struct Sink(mpsc::UnboundedSender<Event>);

    #[async_trait]
    impl Observe for Sink {
        async fn on_event(&self, event: &Event) {
            if event.kind.is_failure() {
                let _ = self.0.send(event.clone());
            }
        }
    }

    #[tokio::test]
    async fn test_observer_sees_panics_with_subscription() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let w = PubSubWorker::<u32>::build(&WorkerConfig::default(), vec![Arc::new(Sink(tx))]);
        let id = w.sub_fn("fragile", |n: u32| async move {
            if n == 13 {
                panic!("unlucky");
            }
            Ok(())
        });
        w.run(CancellationToken::new());
        w.publish(13).await.unwrap();

        let ev = rx.recv().await.expect("panic event");
        assert_eq!(ev.kind, EventKind::HandlerPanicked);
        assert_eq!(ev.subscription, Some(id.get()));
        assert_eq!(ev.reason.as_deref(), Some("unlucky"));
    }

    struct Recorder(mpsc::UnboundedSender<EventKind>);

    #[async_trait]
    impl Observe for Recorder {
        async fn on_event(&self, event: &Event) {
            let _ = self.0.send(event.kind);
        }
    }

    #[tokio::test]
    async fn test_registry_changes_published_before_first_run() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let w = PubSubWorker::<u32>::build(&WorkerConfig::default(), vec![Arc::new(Recorder(tx))]);

        let id = w.sub_fn("audit", |_| async { Ok(()) });
        assert!(w.unsub(id));
        w.run(CancellationToken::new());

        assert_eq!(rx.recv().await, Some(EventKind::Subscribed));
        assert_eq!(rx.recv().await, Some(EventKind::Unsubscribed));
        assert_eq!(rx.recv().await, Some(EventKind::WorkerStarted));
    }
}
