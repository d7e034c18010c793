//! # workerkit
//!
//! **workerkit** provides long-lived background workers for Tokio applications,
//! all driven through one lifecycle contract ([`Worker`]): `run`, `pause`,
//! `resume`, `stop`.
//!
//! Three dispatch patterns are available:
//! - [`EventWorker`]: one handler, values submitted with `invoke` and processed
//!   one at a time in acceptance order
//! - [`PubSubWorker`]: numbered subscribers; `publish` fans a value out to all of
//!   them under a concurrency limit and waits for every one
//! - [`TickerWorker`]: one handler fired on a fixed period
//!
//! ## Architecture
//! ```text
//!   caller ── run / pause / resume / stop ──► Lifecycle (status, generation, stop signal)
//!     │                                            │
//!     │ invoke / publish                           │ one loop per run
//!     ▼                                            ▼
//! ┌───────────────┐   ┌──────────────────────────────────────────────┐
//! │ EventWorker   │──►│ loop: select!(cancel │ stop │ source.next()) │
//! │ PubSubWorker  │   │        └─► dispatch ─► Reporter::invoke      │
//! │ TickerWorker  │   └──────────────────────────────┬───────────────┘
//! └───────────────┘                                  │ Err / panic
//!                                                    ▼
//!                        Bus (broadcast) ◄── lifecycle + registry + failure events
//!                          │
//!                          ├──► listener ──► observer1.on_event()
//!                          └──► listener ──► observerN.on_event()
//! ```
//!
//! ### Lifecycle
//! ```text
//!            run                 pause
//! Stopped ────────► Running ────────────► Paused
//!    ▲   ◄────────     │    ◄────────────    │
//!    │      stop       │        resume       │
//!    └─────────────────┴──── cancellation ───┘
//! ```
//!
//! ## Features
//! | Area              | Description                                         | Key types / traits                              |
//! |-------------------|-----------------------------------------------------|-------------------------------------------------|
//! | **Workers**       | Event, pub/sub and ticker dispatch.                 | [`Worker`], [`EventWorker`], [`PubSubWorker`], [`TickerWorker`] |
//! | **Handlers**      | Processing logic supplied by the caller.            | [`Handler`], [`HandlerFn`], [`HandlerRef`]      |
//! | **Observers**     | Lifecycle, registry and failure events.             | [`Observe`], [`Event`], [`EventKind`]           |
//! | **Errors**        | Invalid lifecycle transitions.                      | [`WorkerError`]                                 |
//! | **Configuration** | Name, fan-out limit, bus capacity.                  | [`WorkerConfig`], [`WorkerBuilder`]             |
//!
//! ## Optional features
//! - `logging`: exports the [`LogWriter`] observer and [`init_tracing`].
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use workerkit::{PubSubWorker, Worker};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let feed = PubSubWorker::<String>::new();
//!     feed.sub_fn("print", |msg: String| async move {
//!         println!("got {msg}");
//!         Ok(())
//!     });
//!
//!     let token = CancellationToken::new();
//!     feed.run(token.clone());
//!     feed.publish("hello".to_string()).await?;
//!
//!     token.cancel();
//!     feed.stopped().await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod handlers;
mod observers;
mod workers;

#[cfg(feature = "logging")]
mod logging;

// ---- Public re-exports ----

pub use core::{Status, WorkerBuilder, WorkerConfig};
pub use error::WorkerError;
pub use events::{Event, EventKind};
pub use handlers::{BoxHandlerFuture, Handler, HandlerFn, HandlerRef, HandlerResult};
pub use observers::Observe;
pub use workers::{EventWorker, PubSubWorker, SubscriptionId, TickerWorker, Worker};

// Optional: tracing-backed observer and subscriber setup.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use logging::init_tracing;
#[cfg(feature = "logging")]
pub use observers::LogWriter;
