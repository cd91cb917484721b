//! Tracing setup for the binary
//!
//! Log lines go to stderr so they do not interleave with the board drawn on
//! stdout. The filter comes from `RUST_LOG` and defaults to
//! [`DEFAULT_LOG_FILTER`].

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "gradeboard=info";

/// Install the global subscriber. Call once, early in `main`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
