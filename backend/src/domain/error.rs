//! Domain-level error taxonomy for the authentication use-cases.
//!
//! These errors are transport agnostic. Driving adapters branch on
//! [`AuthError::code`] and map it to their own status codes; messages and
//! error sources exist for logs only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::auth::CredentialsValidationError;
use super::context::CancelReason;
use super::ports::{AppRegistryError, TokenIssuerError, UserDirectoryError};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidArgument,
    /// Unknown email or wrong password; deliberately indistinguishable.
    InvalidCredentials,
    /// Registration collided with an existing email.
    UserExists,
    /// The admin check reported a missing user or app association.
    InvalidAppId,
    /// App metadata could not be loaded during login.
    AppLookupFailed,
    /// Signing the session token failed.
    TokenIssuanceFailed,
    /// The password hashing worker failed.
    PasswordHashing,
    /// Any other storage failure.
    StorageUnavailable,
    /// The caller cancelled or the deadline passed.
    Cancelled,
}

/// Errors returned by [`crate::domain::ports::Authenticator`] operations.
///
/// # Examples
/// ```
/// use sso::domain::{AuthError, ErrorCode};
///
/// let err = AuthError::invalid_argument("email must not be empty");
/// assert_eq!(err.code(), ErrorCode::InvalidArgument);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user exists")]
    UserExists,
    #[error("invalid app id")]
    InvalidAppId,
    #[error("app lookup failed: {source}")]
    AppLookupFailed {
        #[source]
        source: AppRegistryError,
    },
    #[error("token issuance failed: {source}")]
    TokenIssuanceFailed {
        #[source]
        source: TokenIssuerError,
    },
    #[error("password hashing failed: {message}")]
    PasswordHashing { message: String },
    #[error("storage unavailable: {source}")]
    StorageUnavailable {
        #[source]
        source: UserDirectoryError,
    },
    #[error("{reason}")]
    Cancelled { reason: CancelReason },
}

impl AuthError {
    /// Convenience constructor for [`ErrorCode::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ErrorCode::PasswordHashing`].
    pub fn password_hashing(message: impl Into<String>) -> Self {
        Self::PasswordHashing {
            message: message.into(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::InvalidCredentials => ErrorCode::InvalidCredentials,
            Self::UserExists => ErrorCode::UserExists,
            Self::InvalidAppId => ErrorCode::InvalidAppId,
            Self::AppLookupFailed { .. } => ErrorCode::AppLookupFailed,
            Self::TokenIssuanceFailed { .. } => ErrorCode::TokenIssuanceFailed,
            Self::PasswordHashing { .. } => ErrorCode::PasswordHashing,
            Self::StorageUnavailable { .. } => ErrorCode::StorageUnavailable,
            Self::Cancelled { .. } => ErrorCode::Cancelled,
        }
    }
}

impl From<CredentialsValidationError> for AuthError {
    fn from(err: CredentialsValidationError) -> Self {
        Self::invalid_argument(err.to_string())
    }
}

impl From<CancelReason> for AuthError {
    fn from(reason: CancelReason) -> Self {
        Self::Cancelled { reason }
    }
}
