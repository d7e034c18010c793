//! Worker events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** every worker
//! publishes to.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the lifecycle (transitions), handler invocation sites
//!   (failures and panics), the pub/sub registry.
//! - **Consumers**: one listener task per attached [`Observe`](crate::Observe).

mod bus;
mod event;

pub(crate) use bus::Bus;
pub use event::{Event, EventKind};
