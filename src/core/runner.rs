//! # The background loop of a worker.
//!
//! One loop is spawned per successful `run`. It services three event sources:
//!
//! ```text
//! loop {
//!   select! (biased) {
//!     token.cancelled()  ─► lifecycle.retire(generation) ─► exit(Cancelled)
//!     stop signal        ─► exit(Stopped)          (status already Stopped)
//!     source.next()      ─► Some(item) ─► source.dispatch(item).await
//!                        └► None       ─► lifecycle.retire(generation) ─► exit(Exhausted)
//!   }
//! }
//! ```
//!
//! ## Rules
//! - The loop enters the lifecycle gate first, so runs never overlap
//! - The exit is reported to the lifecycle even if the loop task is aborted
//! - `next()` must be cancel-safe: it races the control signals
//! - `dispatch()` always runs to completion; control signals are observed afterwards

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::lifecycle::{Lifecycle, Ticket};

/// Where a loop gets its work from.
#[async_trait]
pub(crate) trait Source: Send + 'static {
    type Item: Send + 'static;

    /// Waits for the next unit of work. Must be cancel-safe.
    async fn next(&mut self) -> Option<Self::Item>;

    /// Services one unit of work.
    async fn dispatch(&mut self, item: Self::Item);
}

/// Why a loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitReason {
    /// `stop()` was called.
    Stopped,
    /// The cancellation token fired.
    Cancelled,
    /// The source ran dry.
    Exhausted,
}

/// Source for workers whose loop only honors control signals.
pub(crate) struct Idle;

#[async_trait]
impl Source for Idle {
    type Item = Infallible;

    async fn next(&mut self) -> Option<Infallible> {
        std::future::pending().await
    }

    async fn dispatch(&mut self, item: Infallible) {
        match item {}
    }
}

/// Spawns the loop for the run described by `ticket`.
///
/// # Panics
/// Panics when called outside of a Tokio runtime.
pub(crate) fn spawn<S, X>(
    lifecycle: Arc<Lifecycle<S>>,
    ticket: Ticket,
    token: CancellationToken,
    source: X,
) -> JoinHandle<ExitReason>
where
    S: Send + 'static,
    X: Source,
{
    let exit = ExitSignal {
        lifecycle,
        generation: ticket.generation,
    };
    tokio::spawn(drive(exit, ticket, token, source))
}

async fn drive<S, X>(
    exit: ExitSignal<S>,
    ticket: Ticket,
    token: CancellationToken,
    mut source: X,
) -> ExitReason
where
    S: Send + 'static,
    X: Source,
{
    let Ticket {
        generation,
        mut stop,
        gate,
    } = ticket;
    let lifecycle = &exit.lifecycle;
    let _gate = gate.enter().await;
    debug!(worker = %lifecycle.name(), generation, "loop entered");

    let reason = loop {
        let item = tokio::select! {
            biased;
            _ = token.cancelled() => {
                lifecycle.retire(generation);
                break ExitReason::Cancelled;
            }
            _ = &mut stop => break ExitReason::Stopped,
            item = source.next() => item,
        };

        match item {
            Some(item) => source.dispatch(item).await,
            None => {
                lifecycle.retire(generation);
                break ExitReason::Exhausted;
            }
        }
    };

    debug!(worker = %lifecycle.name(), generation, reason = ?reason, "loop exited");
    reason
}

/// Reports the loop exit to the lifecycle when dropped, including when the
/// loop task is aborted before it ever ran.
struct ExitSignal<S> {
    lifecycle: Arc<Lifecycle<S>>,
    generation: u64,
}

impl<S> Drop for ExitSignal<S> {
    fn drop(&mut self) {
        self.lifecycle.mark_exited(self.generation);
    }
}
