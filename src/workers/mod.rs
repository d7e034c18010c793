//! # Workers.
//!
//! Three dispatch patterns behind one lifecycle contract ([`Worker`]):
//! - [`EventWorker`] - one handler, values handed over one at a time by `invoke`
//! - [`PubSubWorker`] - numbered subscribers, each `publish` fans out to all of them
//! - [`TickerWorker`] - one handler fired on a fixed period
//!
//! Worker handles are cheap to clone; clones control the same worker.

mod event;
mod pubsub;
mod ticker;
mod worker;

pub use event::EventWorker;
pub use pubsub::{PubSubWorker, SubscriptionId};
pub use ticker::TickerWorker;
pub use worker::Worker;
