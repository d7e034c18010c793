//! # Core observer trait
//!
//! `Observe` is the extension point for plugging custom event handling into a
//! worker: failure alerting, audit trails, test probes.
//!
//! ## Contract
//! - Implementations may be slow; they never block the worker, only their own
//!   listener. A listener lagging more than the bus capacity skips the oldest events.
//! - A panicking observer is contained and logged; its listener keeps going.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use workerkit::{Event, EventKind, Observe};
//!
//! #[derive(Default)]
//! struct FailureCounter(AtomicU64);
//!
//! #[async_trait::async_trait]
//! impl Observe for FailureCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind.is_failure() {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event observers.
///
/// Called from an observer-dedicated listener task.
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Handle a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
