//! Tracing subscriber setup for binaries.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `default_level` applies when `AURA_LOG` is unset. Safe to call more than
/// once; subsequent calls are no-ops.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("AURA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
