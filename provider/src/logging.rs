//! Tracing setup for processes embedding the provider.
//!
//! Output goes to stderr: the host may reserve stdout for its own protocol.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter, e.g. `dataminded_core=debug`.
pub const LOG_ENV: &str = "DATAMINDED_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install a global subscriber filtered by `DATAMINDED_LOG` (default `info`).
///
/// Panics if a global subscriber is already installed; use
/// [`try_init_logging`] when that may be the case.
pub fn init_logging() {
    init_logging_with_default(DEFAULT_FILTER);
}

/// Like [`init_logging`] with a caller-chosen default filter.
pub fn init_logging_with_default(default_filter: &str) {
    if let Err(err) = try_init(default_filter) {
        panic!("failed to install tracing subscriber: {err}");
    }
}

/// Install the subscriber unless one is already set. Returns `false` when
/// another subscriber won.
pub fn try_init_logging() -> bool {
    try_init(DEFAULT_FILTER).is_ok()
}

fn try_init(default_filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
}
