//! Sets up a global `tracing` subscriber that writes either JSON or
//! pretty logs.

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `directives` when it is set and
/// valid. Fails if a global subscriber has already been installed.
pub fn setup_logging(directives: &str, pretty: bool) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let json_layer = (!pretty).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(false)
            .with_current_span(true)
            .with_span_list(true)
            .with_line_number(true)
            .with_file(true)
            .with_timer(UtcTime::rfc_3339())
    });
    let pretty_layer = pretty.then(|| {
        tracing_subscriber::fmt::layer()
            .pretty()
            .with_timer(UtcTime::rfc_3339())
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
}

/// Install the global subscriber described by the logging section of
/// the configuration.
pub fn setup_logging_from_config(config: &LoggingConfig) -> Result<(), TryInitError> {
    setup_logging(&config.directives, config.pretty)
}
