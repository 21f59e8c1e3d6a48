//! Tracing subscriber setup for the CLI.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! binary's job. Logs go to stderr so stdout stays clean for JSON output.

use tracing_subscriber::EnvFilter;

/// Filter used when neither RUST_LOG nor the settings provide one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Builds the filter: RUST_LOG wins, then `--debug`, then the configured level.
pub fn build_filter(level: &str, debug_mode: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let directive = if debug_mode { "entity_atlas=debug" } else { level };
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Installs the global subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: &str, debug_mode: bool) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level, debug_mode))
        .with_target(debug_mode)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level, debug_mode, "logging initialized");
    }
}
