//! `backupkit_log` v1:
//! Shared `tracing` subscriber setup for backupkit binaries.
//!
//! Diagnostics always go to stderr so stdout stays reserved for the
//! human-readable run summary.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the verbosity-derived filter.
pub const C_ENV_LOG_FILTER: &str = "RUST_LOG";

/// Filter directives for a `-v` repeat count.
///
/// `globset` stays at `warn` below trace level; its debug output is per-glob
/// compilation noise.
pub fn derive_filter_directives(n_verbosity: u8) -> &'static str {
    match n_verbosity {
        0 => "warn",
        1 => "info,globset=warn",
        2 => "debug,globset=warn",
        _ => "trace",
    }
}

/// Build the active filter: `RUST_LOG` when set and valid, else verbosity.
pub fn derive_env_filter(n_verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(C_ENV_LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(derive_filter_directives(n_verbosity)))
}

/// Install the global fmt subscriber.
///
/// `if_quiet` disables logging entirely. Calling this more than once is a
/// no-op after the first successful install.
pub fn init_logging(n_verbosity: u8, if_quiet: bool) {
    if if_quiet {
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(derive_env_filter(n_verbosity))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
