//! Tracing subscriber setup.
//!
//! ```bash
//! RUST_LOG=info cargo run     # one line per store write and proxy phase
//! RUST_LOG=debug cargo run    # adds every client round-trip and no-op decision
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
///
/// Panics if a global subscriber is already set, so call it once per process.
pub fn setup_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
