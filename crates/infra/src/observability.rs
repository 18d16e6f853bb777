//! Tracing subscriber setup
//!
//! Library components never install a subscriber themselves; they log
//! inside the span they were handed. Applications call [`init_tracing`]
//! once at startup.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Observability setup error
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    /// A global subscriber is already installed
    #[error("Failed to install tracing subscriber: {0}")]
    AlreadyInstalled(String),

    /// Unknown log format name
    #[error("Unknown log format '{0}', expected pretty, compact or json")]
    UnknownFormat(String),
}

/// Output format of the fmt subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ObservabilityError::UnknownFormat(other.to_string())),
        }
    }
}

/// Install a global fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// # Errors
/// Returns [`ObservabilityError::AlreadyInstalled`] instead of panicking when
/// another subscriber was installed first.
pub fn init_tracing(format: LogFormat) -> Result<(), ObservabilityError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| ObservabilityError::AlreadyInstalled(err.to_string()))
}
