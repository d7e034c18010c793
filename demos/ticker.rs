//! # Ticker Worker Example
//!
//! A heartbeat firing every 200ms, paused for a while, with every event written
//! through `tracing` by the built-in `LogWriter`.
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example ticker --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use workerkit::{HandlerFn, LogWriter, Worker, WorkerBuilder, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let heartbeat = WorkerBuilder::default()
        .name("heartbeat")
        .observer(Arc::new(LogWriter::new()))
        .ticker(
            Duration::from_millis(200),
            HandlerFn::arc("beat", |()| async {
                tracing::info!("beat");
                Ok::<_, anyhow::Error>(())
            }),
        );

    let token = CancellationToken::new();
    heartbeat.run(token.clone());

    tokio::time::sleep(Duration::from_millis(700)).await;
    heartbeat.pause()?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    heartbeat.resume()?;
    tokio::time::sleep(Duration::from_millis(500)).await;

    token.cancel();
    heartbeat.stopped().await;
    // Let the observer drain.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
