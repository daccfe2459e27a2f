//! Observability setup.
//!
//! Initializes the tracing subscriber. `RUST_LOG` controls the level
//! (default: info) and `LOG_FORMAT=json` switches to structured output.

use crate::config::LogFormat;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Logs go to stderr without ANSI colors so they read well in containers.
pub fn init_tracing(format: LogFormat) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
}
