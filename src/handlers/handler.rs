//! # Handler abstraction.
//!
//! A [`Handler`] has a stable [`name`](Handler::name) and a [`call`](Handler::call)
//! method producing a fresh `'static` future per datum, so that the worker can run
//! it on its own loop, on a spawned task, or concurrently with siblings.
//!
//! Returning `Err` or panicking never takes the worker down: the failure is
//! contained at the call site, logged and published as an [`Event`](crate::Event).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Result of one handler invocation.
pub type HandlerResult = anyhow::Result<()>;

/// Boxed future returned by [`Handler::call`].
pub type BoxHandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'static>>;

/// Shared handle to a handler.
pub type HandlerRef<T> = Arc<dyn Handler<T>>;

/// # Processes one datum of type `T`.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use workerkit::{BoxHandlerFuture, Handler};
///
/// struct Counter(Arc<AtomicU64>);
///
/// impl Handler<u64> for Counter {
///     fn name(&self) -> &str { "counter" }
///
///     fn call(&self, n: u64) -> BoxHandlerFuture {
///         let total = Arc::clone(&self.0);
///         Box::pin(async move {
///             total.fetch_add(n, Ordering::Relaxed);
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Handler<T>: Send + Sync + 'static {
    /// Returns a stable, human-readable handler name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Creates the future processing `data`.
    fn call(&self, data: T) -> BoxHandlerFuture;
}
