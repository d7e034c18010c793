//! # Event observers.
//!
//! Observers are the injectable sinks for worker [`Event`](crate::Event)s, most
//! importantly for handler failures, which are otherwise only logged.
//!
//! ## Architecture
//! ```text
//! Worker ── publish(Event) ──► Bus ──┬──► listener 1 ──► observer1.on_event()
//!                                   ├──► listener 2 ──► observer2.on_event()
//!                                   └──► listener N ──► observerN.on_event()
//! ```
//!
//! Each observer gets its own bus receiver at build time (so nothing published
//! before the first `run` is missed, up to the bus capacity) and its own listener
//! task, spawned on the first `run`.

mod observer;
mod observer_set;

#[cfg(feature = "logging")]
mod log;

pub use observer::Observe;
pub(crate) use observer_set::ObserverSet;

#[cfg(feature = "logging")]
pub use log::LogWriter;
