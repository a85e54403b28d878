//! Tracing subscriber setup
//!
//! Logs go to stderr so that `--json` command output on stdout stays machine readable.
//! `RUST_LOG` wins over the configured level when it is set.

use tracing_subscriber::EnvFilter;

use crate::error::{SmartCutError, SmartCutResult};
use crate::ports::LogLevel;

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(level: LogLevel, json: bool) -> SmartCutResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| SmartCutError::Logging {
        message: e.to_string(),
    })?;

    tracing::debug!("Logging initialized at level {}", level.as_str());
    Ok(())
}
