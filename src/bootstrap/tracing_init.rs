//! Tracing initialization from the loaded logging settings.

use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize tracing with the configured level and output stream.
///
/// The level can be overridden by the `RUST_LOG` environment variable.
/// Fails if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use bootconf::{init_tracing, RuntimeConfig};
///
/// let config = RuntimeConfig::from_overrides(["log_level=debug"]).unwrap();
/// init_tracing(&config.logging).expect("tracing already initialized");
/// ```
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_filter()));

    let layer = if logging.stderr {
        fmt::layer().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stdout).boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
}
