//! Tracing subscriber setup.
//!
//! Filtering follows `RUST_LOG` via [`EnvFilter`]. Output is JSON by default
//! for log shippers, or pretty text for local runs.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::SettingsError;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human readable output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(SettingsError::UnknownLogFormat {
                value: value.to_owned(),
            }),
        }
    }
}

/// Global subscriber could not be installed.
#[derive(Debug, Error)]
#[error("tracing init failed: {message}")]
pub struct TelemetryError {
    message: String,
}

/// Install the global tracing subscriber.
///
/// Fails, rather than panicking, when a global subscriber already exists.
pub fn init_tracing(format: LogFormat) -> Result<(), TelemetryError> {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    result.map_err(|err| TelemetryError {
        message: err.to_string(),
    })
}
