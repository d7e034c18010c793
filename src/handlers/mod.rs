//! # Processing units.
//!
//! Workers never own their processing logic; they invoke handlers supplied by
//! the caller:
//! - [`Handler`] - trait for one async processing step over a datum
//! - [`HandlerFn`] - closure-backed implementation
//! - [`HandlerRef`] - shared reference to a handler (`Arc<dyn Handler<T>>`)
//!
//! Ticker workers use `Handler<()>`.

mod handler;
mod handler_fn;

pub use handler::{BoxHandlerFuture, Handler, HandlerRef, HandlerResult};
pub use handler_fn::HandlerFn;
