//! Service settings loaded via OrthoConfig.
//!
//! Values layer CLI arguments over `SSO_*` environment variables over a
//! configuration file; every field is optional and falls back to a default.

use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{PasswordHashError, PasswordHasher};
use crate::telemetry::LogFormat;

/// Token lifetime in seconds used when none is configured.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60;
/// Token lifetime used when none is configured.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(DEFAULT_TOKEN_TTL_SECS);

/// Invalid setting values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Tokens must expire, and not immediately.
    #[error("token ttl must be greater than zero")]
    ZeroTokenTtl,
    /// The configured bcrypt work factor is unusable.
    #[error(transparent)]
    BcryptCost(#[from] PasswordHashError),
    /// Log format is neither `json` nor `pretty`.
    #[error("unknown log format: {value}")]
    UnknownLogFormat { value: String },
}

/// Configuration values for the authentication service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SSO")]
pub struct AuthSettings {
    /// Lifetime of issued tokens, in seconds.
    #[ortho_config(default = DEFAULT_TOKEN_TTL_SECS)]
    pub token_ttl_secs: u64,
    /// bcrypt work factor used when hashing new passwords.
    pub bcrypt_cost: Option<u32>,
    /// Log output format: `json` or `pretty`.
    pub log_format: Option<String>,
}

impl AuthSettings {
    /// Configured token lifetime; [`DEFAULT_TOKEN_TTL`] unless overridden.
    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        match self.token_ttl_secs {
            0 => Err(SettingsError::ZeroTokenTtl),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Hasher for the configured work factor, falling back to bcrypt's
    /// recommended default.
    pub fn password_hasher(&self) -> Result<PasswordHasher, SettingsError> {
        match self.bcrypt_cost {
            Some(cost) => Ok(PasswordHasher::new(cost)?),
            None => Ok(PasswordHasher::default()),
        }
    }

    /// Configured log format, falling back to JSON.
    pub fn log_format(&self) -> Result<LogFormat, SettingsError> {
        self.log_format
            .as_deref()
            .map_or(Ok(LogFormat::default()), LogFormat::from_str)
    }
}
