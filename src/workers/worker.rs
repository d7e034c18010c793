//! # The lifecycle contract.
//!
//! | Operation | Valid from                       | Result  | Failure      |
//! |-----------|----------------------------------|---------|--------------|
//! | `run`     | Stopped (Running/Paused: no-op)  | Running | none         |
//! | `pause`   | Running                          | Paused  | `NotRunning` |
//! | `resume`  | Paused                           | Running | `NotPaused`  |
//! | `stop`    | Running                          | Stopped | `NotRunning` |
//!
//! Cancelling the token passed to `run` is an implicit stop, honored from
//! Running and Paused alike.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::Status;
use crate::error::WorkerError;

/// # Controllable background worker.
///
/// All methods are safe to call concurrently from any thread.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use workerkit::{EventWorker, Status, Worker, WorkerError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let worker = EventWorker::from_fn("echo", |line: String| async move {
///         println!("{line}");
///         Ok(())
///     });
///
///     assert_eq!(worker.pause(), Err(WorkerError::NotRunning));
///
///     worker.run(CancellationToken::new());
///     worker.invoke("hello".to_string()).await.unwrap();
///     worker.stop().unwrap();
///     worker.stopped().await;
///     assert_eq!(worker.status(), Status::Stopped);
/// }
/// ```
#[async_trait]
pub trait Worker: Send + Sync {
    /// Worker name, as configured.
    fn name(&self) -> &str;

    /// Current status.
    ///
    /// Informational only: by the time the caller looks at it, a concurrent
    /// transition may have happened. The transition methods re-check under lock.
    fn status(&self) -> Status;

    /// Starts the background loop and returns immediately.
    ///
    /// No-op unless the worker is Stopped. The loop exits on [`stop`](Worker::stop)
    /// or when `token` is cancelled.
    ///
    /// # Panics
    /// Panics when called outside of a Tokio runtime.
    fn run(&self, token: CancellationToken);

    /// Running → Paused.
    fn pause(&self) -> Result<(), WorkerError>;

    /// Paused → Running.
    fn resume(&self) -> Result<(), WorkerError>;

    /// Running → Stopped. Signals the loop without waiting for it.
    fn stop(&self) -> Result<(), WorkerError>;

    /// Waits until the background loop has exited.
    ///
    /// Returns immediately if no loop is active. An in-flight dispatch completes
    /// before the loop exits.
    async fn stopped(&self);
}
