// Logging setup.
// Installs the tracing subscriber the binary logs through.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging.
///
/// Verbosity follows `RUST_LOG` (for example `RUST_LOG=pokefetch=debug`)
/// and defaults to `info`.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
