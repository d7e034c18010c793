//! # Per-observer listeners.
//!
//! [`ObserverSet`] subscribes every observer to the worker's bus when the worker
//! is built, and spawns one listener task per observer on the first `run`
//! (construction does not require a Tokio runtime).
//!
//! ## Rules
//! - **Per-observer FIFO**: each observer sees events in publication order
//! - **Isolation**: a slow or panicking observer affects nobody else
//! - **Lag**: on overflow the listener logs the skip count and continues
//! - **Shutdown**: a listener ends once every bus sender is gone (worker dropped
//!   and its loop exited)

use std::mem;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, warn};

use crate::core::panic_message;
use crate::events::{Bus, Event};
use crate::observers::Observe;

type Pending = Vec<(Arc<dyn Observe>, broadcast::Receiver<Event>)>;

/// Observers of one worker, waiting for or running their listeners.
pub(crate) struct ObserverSet {
    worker: Arc<str>,
    pending: Mutex<Pending>,
}

impl ObserverSet {
    /// Subscribes each observer to `bus`.
    pub fn new(worker: Arc<str>, bus: &Bus, observers: Vec<Arc<dyn Observe>>) -> Self {
        let pending = observers
            .into_iter()
            .map(|obs| (obs, bus.subscribe()))
            .collect();
        Self {
            worker,
            pending: Mutex::new(pending),
        }
    }

    /// Spawns listeners for observers that do not have one yet.
    ///
    /// # Panics
    /// Panics when called outside of a Tokio runtime and listeners are pending.
    pub fn start(&self) {
        let pending = mem::take(&mut *self.pending.lock());
        for (obs, rx) in pending {
            tokio::spawn(listen(Arc::clone(&self.worker), obs, rx));
        }
    }
}

async fn listen(worker: Arc<str>, obs: Arc<dyn Observe>, mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(ev) => {
                if let Err(payload) = AssertUnwindSafe(obs.on_event(&ev)).catch_unwind().await {
                    error!(
                        worker = %worker,
                        observer = obs.name(),
                        panic = %panic_message(payload.as_ref()),
                        "observer panicked"
                    );
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(worker = %worker, observer = obs.name(), skipped, "observer lagged behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
