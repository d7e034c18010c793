//! Runtime core: lifecycle and loop machinery shared by every worker.
//!
//! Public API from this module: [`Status`], [`WorkerConfig`], [`WorkerBuilder`].
//!
//! Internal modules:
//! - [`lifecycle`]: the status state machine, stop signal and loop gate;
//! - [`runner`]: the background loop servicing cancellation, stop and a source;
//! - [`invoke`]: isolated handler invocation and failure reporting;
//! - [`shared`]: per-worker wiring of the above to one event bus.

mod builder;
mod config;
mod invoke;
mod lifecycle;
mod runner;
mod shared;
mod status;

pub use builder::WorkerBuilder;
pub use config::WorkerConfig;
pub use status::Status;

pub(crate) use invoke::{Reporter, panic_message};
pub(crate) use lifecycle::Lifecycle;
pub(crate) use runner::{Idle, Source};
pub(crate) use shared::Shared;
