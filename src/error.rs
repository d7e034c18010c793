//! Error types used by workerkit.
//!
//! [`WorkerError`] is the only error a caller ever receives from a worker: it
//! reports a lifecycle operation attempted from the wrong state. Failures of
//! caller-supplied handlers never surface here; they are isolated per
//! invocation and published as [`Event`](crate::Event)s instead.
//!
//! Like the rest of the crate, the error provides a stable label
//! ([`WorkerError::as_label`]) for logs and dashboards.

use thiserror::Error;

/// # Lifecycle violations.
///
/// Returned synchronously by `pause`, `resume`, `stop`, `invoke` and `publish`.
/// An operation that fails with one of these never changes the worker's state.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerError {
    /// The operation requires [`Status::Running`](crate::Status::Running).
    #[error("worker is not running")]
    NotRunning,

    /// The operation requires [`Status::Paused`](crate::Status::Paused).
    #[error("worker is not paused")]
    NotPaused,
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use workerkit::WorkerError;
    ///
    /// assert_eq!(WorkerError::NotRunning.as_label(), "worker_not_running");
    /// assert_eq!(WorkerError::NotPaused.as_label(), "worker_not_paused");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::NotRunning => "worker_not_running",
            WorkerError::NotPaused => "worker_not_paused",
        }
    }
}
