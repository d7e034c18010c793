//! # Ticker worker.
//!
//! Fires one handler every `period` while Running.
//!
//! ```text
//! run ──(period)── tick ──(period)── tick ──(period)── tick ...
//!                   │                 │                 │
//!              Running: spawn    Paused: discard   Running: spawn
//! ```
//!
//! ## Rules
//! - The first tick comes one full period after `run`
//! - Each tick spawns its own invocation; slow handlers may overlap
//! - Ticks keep their schedule while Paused; `resume` does not shift the phase
//! - A loop delayed past several ticks fires once, not in a burst

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::core::{Reporter, Shared, Source, Status, WorkerConfig};
use crate::error::WorkerError;
use crate::handlers::{HandlerFn, HandlerRef, HandlerResult};
use crate::observers::Observe;
use crate::workers::Worker;

const MIN_PERIOD: Duration = Duration::from_millis(1);

struct Inner {
    shared: Shared<()>,
    period: Duration,
    handler: HandlerRef<()>,
}

/// Worker firing a handler on a fixed period.
#[derive(Clone)]
pub struct TickerWorker {
    inner: Arc<Inner>,
}

impl TickerWorker {
    /// Creates a worker with the default configuration.
    pub fn new(period: Duration, handler: HandlerRef<()>) -> Self {
        Self::build(&WorkerConfig::default(), Vec::new(), period, handler)
    }

    /// Creates a worker named `name` around a closure (the handler gets the same name).
    pub fn from_fn<F, Fut>(name: &'static str, period: Duration, f: F) -> Self
    where
        F: Fn(()) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let cfg = WorkerConfig {
            name: name.into(),
            ..WorkerConfig::default()
        };
        Self::build(&cfg, Vec::new(), period, HandlerFn::arc(name, f))
    }

    pub(crate) fn build(
        cfg: &WorkerConfig,
        observers: Vec<Arc<dyn Observe>>,
        period: Duration,
        handler: HandlerRef<()>,
    ) -> Self {
        let period = if period.is_zero() {
            warn!(worker = %cfg.name, "zero ticker period, using {MIN_PERIOD:?}");
            MIN_PERIOD
        } else {
            period
        };

        Self {
            inner: Arc::new(Inner {
                shared: Shared::new(cfg, observers),
                period,
                handler,
            }),
        }
    }

    /// Period between ticks.
    pub fn period(&self) -> Duration {
        self.inner.period
    }
}

#[async_trait]
impl Worker for TickerWorker {
    fn name(&self) -> &str {
        self.inner.shared.lifecycle.name()
    }

    fn status(&self) -> Status {
        self.inner.shared.lifecycle.status()
    }

    fn run(&self, token: CancellationToken) {
        let shared = &self.inner.shared;
        shared.launch(token, (), |generation| {
            let period = self.inner.period;
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            TickSource {
                interval,
                generation,
                worker: self.clone(),
                reporter: shared.reporter.clone(),
            }
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

struct TickSource {
    interval: Interval,
    generation: u64,
    worker: TickerWorker,
    reporter: Reporter,
}

#[async_trait]
impl Source for TickSource {
    type Item = Instant;

    async fn next(&mut self) -> Option<Instant> {
        Some(self.interval.tick().await)
    }

    async fn dispatch(&mut self, at: Instant) {
        if !self.worker.inner.shared.lifecycle.accepts(self.generation) {
            trace!(worker = %self.worker.name(), ?at, "tick discarded");
            return;
        }

        let handler = Arc::clone(&self.worker.inner.handler);
        let reporter = self.reporter.clone();
        tokio::spawn(async move {
            reporter.invoke(&*handler, (), None).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(period: Duration) -> (TickerWorker, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let w = TickerWorker::from_fn("tick", period, move |()| {
            h.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        });
        (w, hits)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let (w, hits) = counting(ms(100));
        w.run(CancellationToken::new());

        time::sleep(ms(99)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        time::sleep(ms(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_ticks_are_discarded_and_phase_kept() {
        let (w, hits) = counting(ms(100));
        w.run(CancellationToken::new());

        time::sleep(ms(250)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        w.pause().unwrap();
        time::sleep(ms(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        // Resumed at 450ms; the next tick is still at 500ms.
        w.resume().unwrap();
        time::sleep(ms(60)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        w.stop().unwrap();
        w.stopped().await;
        time::sleep(ms(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_handlers_overlap() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (a, p) = (Arc::clone(&active), Arc::clone(&peak));
        let w = TickerWorker::from_fn("slow", ms(10), move |()| {
            let (a, p) = (Arc::clone(&a), Arc::clone(&p));
            async move {
                let now = a.fetch_add(1, Ordering::SeqCst) + 1;
                p.fetch_max(now, Ordering::SeqCst);
                time::sleep(ms(35)).await;
                a.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        });
        w.run(CancellationToken::new());

        time::sleep(ms(100)).await;
        w.stop().unwrap();
        assert!(peak.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_tick_keeps_ticker_alive() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let w = TickerWorker::from_fn("flaky", ms(10), move |()| {
            let n = h.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    panic!("first tick fails");
                }
                Ok(())
            }
        });
        w.run(CancellationToken::new());

        time::sleep(ms(35)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(w.status(), Status::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_while_paused_stops() {
        let (w, _hits) = counting(ms(10));
        let token = CancellationToken::new();
        w.run(token.clone());
        w.pause().unwrap();

        token.cancel();
        w.stopped().await;
        assert_eq!(w.status(), Status::Stopped);
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let (w, _hits) = counting(Duration::ZERO);
        assert_eq!(w.period(), MIN_PERIOD);
    }
}
