//! Logging initialization.
//!
//! Logs go to stderr so that rendered HTML on stdout stays clean.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `citenote=warn`, or
/// `citenote=debug` when `verbose` is set. Later calls are no-ops, and so is
/// the first one when the host process already installed a subscriber.
pub fn init(verbose: bool) {
    INIT_ONCE.call_once(|| {
        let default = if verbose { "citenote=debug" } else { "citenote=warn" };
        let result = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
            )
            .try_init();
        // Only fails when a global subscriber exists; events go to that one.
        if let Err(err) = result {
            tracing::debug!(%err, "keeping the existing global subscriber");
        }
    });
}
