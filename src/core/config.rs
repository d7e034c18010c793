//! # Per-worker configuration.
//!
//! Provides [`WorkerConfig`], the settings shared by every worker variant.
//!
//! Config is used in two ways:
//! 1. **Builder**: `WorkerBuilder::new(config)` then `.event(..)` / `.pubsub()` / `.ticker(..)`
//! 2. **Shortcuts**: `EventWorker::new(handler)` etc. use `WorkerConfig::default()`
//!
//! ## Sentinel values
//! - `max_parallel = 0` → `2 × available hardware parallelism`
//! - `bus_capacity = 0` → clamped to 1

use std::borrow::Cow;
use std::num::NonZeroUsize;

/// Configuration for a single worker.
///
/// ## Field semantics
/// - `name`: label attached to every log line and [`Event`](crate::Event)
/// - `max_parallel`: pub/sub fan-out limit (`0` = `2 × available_parallelism`)
/// - `bus_capacity`: event bus ring buffer size (min 1)
///
/// ## Notes
/// Fields are public; prefer the accessors to avoid sprinkling sentinel checks.
#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Human-readable worker name.
    pub name: Cow<'static, str>,

    /// Maximum number of subscriber invocations running at once for a pub/sub worker.
    ///
    /// - `0` = derive from the machine (`2 × available_parallelism`)
    /// - `n > 0` = at most `n`
    ///
    /// Ignored by event and ticker workers.
    pub max_parallel: usize,

    /// Capacity of the worker's event bus.
    ///
    /// Observers lagging more than `bus_capacity` events behind skip the oldest ones.
    pub bus_capacity: usize,
}

impl WorkerConfig {
    /// Returns the fan-out limit, resolving the `0` sentinel.
    #[inline]
    pub fn parallel_limit(&self) -> usize {
        match self.max_parallel {
            0 => default_parallelism(),
            n => n,
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for WorkerConfig {
    /// Default configuration:
    ///
    /// - `name = "worker"`
    /// - `max_parallel = 0` (2 × available parallelism)
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("worker"),
            max_parallel: 0,
            bus_capacity: 256,
        }
    }
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        * 2
}
