//! Diagnostic logging setup
//!
//! The pipeline logs through `tracing` macros; nothing is printed until a
//! subscriber is installed with [`init`]. Output always goes to stderr so the
//! viewer's screen stays clean.

use thiserror::Error;
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::fmt;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable consulted when no level is given explicitly
pub const LOG_LEVEL_ENV: &str = "KNIT_LOG_LEVEL";

const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level {level:?}: {source}")]
    InvalidLevel {
        level: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    AlreadyInitialized(#[from] TryInitError),
}

/// Pick the filter directive: explicit level, then the environment, then `warn`
pub fn directive(level: Option<&str>, env: Option<String>) -> String {
    level
        .map(str::to_string)
        .or(env)
        .filter(|level| !level.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Install the global subscriber.
///
/// `level` accepts anything an `EnvFilter` does, from a bare `debug` to
/// `knit::knit::engine=trace`. With `timer`, each event is stamped with the
/// time since startup.
pub fn init(level: Option<&str>, timer: bool) -> Result<(), LoggingError> {
    let level = directive(level, std::env::var(LOG_LEVEL_ENV).ok());
    let filter = EnvFilter::try_new(&level).map_err(|source| LoggingError::InvalidLevel {
        level: level.clone(),
        source,
    })?;

    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let registry = tracing_subscriber::registry().with(filter);
    if timer {
        registry.with(layer.with_timer(fmt::time::uptime())).try_init()?;
    } else {
        registry.with(layer.without_time()).try_init()?;
    }
    tracing::debug!(%level, "logging initialised");
    Ok(())
}
