//! # Event Worker Example
//!
//! Feeds lines into an event worker, pausing it halfway to show that submissions
//! are rejected while paused.
//!
//! ## Run
//! ```bash
//! cargo run --example event
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;
use workerkit::{EventWorker, Worker, WorkerError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let total = Arc::new(AtomicU64::new(0));
    let t = Arc::clone(&total);

    let worker = EventWorker::from_fn("summer", move |line: String| {
        let t = Arc::clone(&t);
        async move {
            let n: u64 = line.trim().parse()?;
            t.fetch_add(n, Ordering::Relaxed);
            println!(" ├─► added {n}");
            Ok::<_, anyhow::Error>(())
        }
    });

    worker.run(CancellationToken::new());
    for line in ["1", "2", "three", "4"] {
        worker.invoke(line.to_string()).await?;
    }

    worker.pause()?;
    match worker.invoke("100".to_string()).await {
        Err(WorkerError::NotRunning) => println!(" ├─► paused: submission rejected"),
        other => println!(" ├─► unexpected: {other:?}"),
    }
    worker.resume()?;
    worker.invoke("5".to_string()).await?;

    worker.stop()?;
    worker.stopped().await;
    println!(" └─► total = {}", total.load(Ordering::Relaxed));
    Ok(())
}
