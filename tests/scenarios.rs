//! End-to-end runs of the three worker variants through the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use workerkit::{
    Event, EventKind, EventWorker, HandlerFn, Observe, PubSubWorker, Status, TickerWorker, Worker,
    WorkerBuilder,
};

#[tokio::test]
async fn event_worker_counts_every_invoke() {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&counter);
    let worker = EventWorker::from_fn("counter", move |_: ()| {
        c.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    });

    worker.run(CancellationToken::new());
    for _ in 0..5 {
        worker.invoke(()).await.unwrap();
    }
    worker.stop().unwrap();
    worker.stopped().await;

    assert_eq!(counter.load(Ordering::SeqCst), 5);
    assert_eq!(worker.status(), Status::Stopped);
}

#[tokio::test]
async fn pubsub_delivers_once_to_each_subscriber() {
    let worker = PubSubWorker::<String>::new();
    worker.run(CancellationToken::new());

    let recorders: Vec<Arc<Mutex<Vec<String>>>> =
        (0..3).map(|_| Arc::new(Mutex::new(Vec::new()))).collect();
    for rec in &recorders {
        let rec = Arc::clone(rec);
        worker.sub_fn("recorder", move |msg: String| {
            rec.lock().push(msg);
            async { Ok(()) }
        });
    }

    worker.publish("x".to_string()).await.unwrap();

    for rec in &recorders {
        assert_eq!(*rec.lock(), vec!["x".to_string()]);
    }
    worker.stop().unwrap();
}

#[tokio::test(start_paused = true)]
async fn ticker_skips_the_paused_window() {
    let unit = Duration::from_secs(1);
    let ticks = Arc::new(AtomicUsize::new(0));
    let t = Arc::clone(&ticks);
    let worker = TickerWorker::from_fn("ticker", unit, move |()| {
        t.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    });

    worker.run(CancellationToken::new());
    tokio::time::sleep(unit * 7 / 2).await;
    worker.pause().unwrap();
    let before_pause = ticks.load(Ordering::SeqCst);

    tokio::time::sleep(unit * 2).await;
    assert_eq!(ticks.load(Ordering::SeqCst), before_pause);

    worker.resume().unwrap();
    tokio::time::sleep(unit * 2).await;
    worker.stop().unwrap();
    worker.stopped().await;
    let after_resume = ticks.load(Ordering::SeqCst) - before_pause;

    assert_eq!(before_pause, 3);
    assert_eq!(after_resume, 2);
}

struct Failures(Mutex<Vec<Event>>);

#[async_trait::async_trait]
impl Observe for Failures {
    async fn on_event(&self, event: &Event) {
        if event.kind.is_failure() {
            self.0.lock().push(event.clone());
        }
    }

    fn name(&self) -> &'static str {
        "failures"
    }
}

#[tokio::test]
async fn builder_wires_observers_to_failures() {
    let failures = Arc::new(Failures(Mutex::new(Vec::new())));
    let worker = WorkerBuilder::default()
        .name("ingest")
        .observer(failures.clone())
        .event(HandlerFn::arc("parse", |line: &'static str| async move {
            line.parse::<u32>()?;
            Ok::<_, anyhow::Error>(())
        }));

    let token = CancellationToken::new();
    worker.run(token.clone());
    worker.invoke("12").await.unwrap();
    worker.invoke("twelve").await.unwrap();
    worker.invoke("13").await.unwrap();

    token.cancel();
    worker.stopped().await;
    assert_eq!(worker.status(), Status::Stopped);

    // Observer delivery is asynchronous.
    for _ in 0..100 {
        if !failures.0.lock().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let seen = failures.0.lock().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, EventKind::HandlerFailed);
    assert_eq!(&*seen[0].worker, "ingest");
    assert_eq!(seen[0].handler.as_deref(), Some("parse"));
}
