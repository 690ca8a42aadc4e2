//! Logging and tracing utilities.
//!
//! Reconcilers in this crate emit structured events through the `tracing`
//! ecosystem ("created a branch", "updated an endpoint", …). These helpers
//! install a subscriber for hosts that don't bring their own. All output
//! goes to **stderr**, leaving stdout free for whatever protocol the host
//! process speaks.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: controls log levels, e.g. `info`, `debug`, or
//!   `neon_provider=debug` to see every request the reconcilers issue.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the default logging subscriber.
///
/// Writes to stderr, respects `RUST_LOG`, and defaults to `info` when the
/// variable is not set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set. Use
/// [`try_init_logging`] when another component may have installed one.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();
}

/// Try to initialize logging, returning `false` if a subscriber was
/// already set.
///
/// Useful in tests, where several cases may race to install the global
/// subscriber within one process.
pub fn try_init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    // The global subscriber can only be installed once per process, so
    // initialization itself is not exercised here; the filter syntax the
    // docs advertise is.

    use super::*;

    #[test]
    fn test_env_filter_parsing() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new("neon_provider=debug").is_ok());
        assert!(EnvFilter::try_new("warn,neon_provider=trace").is_ok());
    }
}
