//! # Closure-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(T) -> Fut`, producing a fresh future per
//! call. Shared state must be captured explicitly (`Arc<...>`) and cloned into
//! the returned future.
//!
//! ## Example
//! ```rust
//! use workerkit::{HandlerFn, HandlerRef};
//!
//! let h: HandlerRef<String> = HandlerFn::arc("printer", |line: String| async move {
//!     println!("{line}");
//!     Ok::<_, anyhow::Error>(())
//! });
//!
//! assert_eq!(h.name(), "printer");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::handlers::handler::{BoxHandlerFuture, Handler, HandlerResult};

/// Function-backed handler implementation.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`](crate::HandlerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<T, F, Fut> Handler<T> for HandlerFn<F>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, data: T) -> BoxHandlerFuture {
        Box::pin((self.f)(data))
    }
}
