use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

use crate::config::RunConfig;

/// Level directive implied by the verbosity flags.
pub fn log_level(config: &RunConfig) -> &'static str {
    if config.debug {
        "debug"
    } else if config.verbose {
        "info"
    } else {
        "warn"
    }
}

/// Builds the subscriber for one run. `RUST_LOG` takes precedence over the flags.
///
/// Nothing is installed globally; the caller scopes it with
/// `tracing::subscriber::with_default`.
pub fn build_subscriber(config: &RunConfig) -> impl Subscriber + Send + Sync + use<> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(config)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(config.debug)
        .finish()
}
