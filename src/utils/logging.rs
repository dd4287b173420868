//! Structured logging setup.
//!
//! Configures the `tracing` ecosystem for the worker. The host application
//! calls [`init`] once at startup; embedded hosts that already install
//! their own subscriber simply skip it, the worker's spans and events flow
//! into whatever is installed.

use crate::config::LoggingConfig;
use crate::error::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// Supports two output formats:
/// - `json`: structured JSON logs for production ingestion.
/// - `pretty` (default): human-readable, colorized output for development.
///
/// Log levels come from the `RUST_LOG` environment variable when set,
/// otherwise from the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
