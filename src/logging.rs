//! # Tracing setup for binaries and demos.
//!
//! [`init_tracing`] installs a `fmt` subscriber filtered by `RUST_LOG`
//! (default `info`). Calling it twice, or after another global subscriber was
//! installed, is harmless.

use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";

/// Installs the global `fmt` subscriber.
///
/// Returns `false` if a global subscriber was already set.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match fmt().with_env_filter(filter).with_target(true).try_init() {
        Ok(()) => true,
        Err(_) => {
            tracing::debug!("global tracing subscriber already installed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_tracing();
        assert!(!init_tracing());
    }
}
