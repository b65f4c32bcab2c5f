//! Logging initialization for the management CLI.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber.
///
/// The default filter logs this crate at info (debug with `verbose`);
/// the `RUST_LOG` environment variable takes precedence when set.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "hike_server=debug"
    } else {
        "hike_server=info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true));

    let _ = subscriber.try_init();
}
