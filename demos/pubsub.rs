//! # PubSub Worker Example
//!
//! Three subscribers with a fan-out limit of 2, one of them failing. A custom
//! observer counts the failures.
//!
//! ## Run
//! ```bash
//! cargo run --example pubsub
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use workerkit::{Event, EventKind, Observe, Worker, WorkerBuilder};

#[derive(Default)]
struct FailureCounter(AtomicU64);

#[async_trait::async_trait]
impl Observe for FailureCounter {
    async fn on_event(&self, ev: &Event) {
        if let EventKind::HandlerFailed | EventKind::HandlerPanicked = ev.kind {
            self.0.fetch_add(1, Ordering::Relaxed);
            println!(
                " ├─► subscriber #{} failed: {}",
                ev.subscription.unwrap_or_default(),
                ev.reason.as_deref().unwrap_or("?")
            );
        }
    }

    fn name(&self) -> &'static str {
        "failure-counter"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let failures = Arc::new(FailureCounter::default());
    let feed = WorkerBuilder::default()
        .name("prices")
        .max_parallel(2)
        .observer(failures.clone())
        .pubsub::<f64>();

    feed.sub_fn("console", |price: f64| async move {
        println!(" ├─► price {price:.2}");
        Ok(())
    });
    feed.sub_fn("slow-audit", |_: f64| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(())
    });
    let strict = feed.sub_fn("strict", |price: f64| async move {
        anyhow::ensure!(price >= 0.0, "negative price {price}");
        Ok::<_, anyhow::Error>(())
    });

    let token = CancellationToken::new();
    feed.run(token.clone());

    for price in [10.5, -1.0, 12.25] {
        feed.publish(price).await?;
    }
    feed.unsub(strict);
    feed.publish(-2.0).await?;

    token.cancel();
    feed.stopped().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    println!(" └─► failures observed: {}", failures.0.load(Ordering::Relaxed));
    Ok(())
}
