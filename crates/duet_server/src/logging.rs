//! Logging system setup.
//!
//! Structured logging via the tracing crate. The level comes from the
//! `RUST_LOG` environment variable when set, otherwise from the `--debug`
//! flag or the `[logging]` config section.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Args, LoggingSettings};

/// Initialize the global tracing subscriber.
///
/// Can only succeed once per process; tests that race on this call treat
/// the second initialization error as benign.
pub fn setup_logging(args: &Args, settings: Option<&LoggingSettings>) -> Result<()> {
    let level = if args.debug {
        "debug"
    } else {
        settings.map(|s| s.level.as_str()).unwrap_or("info")
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let json_format = settings.map(|s| s.json_format).unwrap_or(false);
    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(false))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .try_init()?;
    }

    Ok(())
}
