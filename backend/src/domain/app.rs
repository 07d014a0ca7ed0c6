//! Client application records.
//!
//! Apps are provisioned outside this service; the domain only reads them to
//! pick the secret that signs a user's session token.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Validation errors returned when constructing app values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppValidationError {
    /// App identifiers are strictly positive.
    NonPositiveId { value: i32 },
}

impl fmt::Display for AppValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId { value } => {
                write!(f, "app id must be positive, got {value}")
            }
        }
    }
}

impl std::error::Error for AppValidationError {}

/// Numeric identifier of a registered client application.
///
/// # Examples
/// ```
/// use sso::domain::AppId;
///
/// assert_eq!(AppId::new(7).unwrap().get(), 7);
/// assert!(AppId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct AppId(i32);

impl AppId {
    /// Validate and construct an [`AppId`].
    pub fn new(value: i32) -> Result<Self, AppValidationError> {
        if value <= 0 {
            return Err(AppValidationError::NonPositiveId { value });
        }
        Ok(Self(value))
    }

    /// Raw identifier value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AppId> for i32 {
    fn from(value: AppId) -> Self {
        value.0
    }
}

impl TryFrom<i32> for AppId {
    type Error = AppValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Per-app token signing secret. Zeroed on drop and redacted from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wrap raw secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Borrow the raw secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Registered client application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    id: AppId,
    name: String,
    secret: SigningSecret,
}

impl App {
    /// Build an app record from its components.
    pub fn new(id: AppId, name: impl Into<String>, secret: SigningSecret) -> Self {
        Self {
            id,
            name: name.into(),
            secret,
        }
    }

    /// App identifier.
    pub fn id(&self) -> AppId {
        self.id
    }

    /// Human readable app name, used for diagnostics only.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Secret used to sign tokens scoped to this app.
    pub fn secret(&self) -> &SigningSecret {
        &self.secret
    }
}
