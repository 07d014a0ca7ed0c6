//! Authentication primitives: caller credentials and issued session tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a driving adapter calls the service.

use std::fmt;

use zeroize::Zeroizing;

use super::password::MAX_PASSWORD_BYTES;
use super::user::{Email, UserValidationError};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email failed validation.
    Email(UserValidationError),
    /// Password was empty.
    EmptyPassword,
    /// Password is longer than bcrypt can hash without truncation.
    PasswordTooLong { len: usize },
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooLong { len } => write!(
                f,
                "password is {len} bytes; at most {MAX_PASSWORD_BYTES} are allowed"
            ),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated email/password pair used for registration and login.
///
/// ## Invariants
/// - `email` satisfies [`Email`] validation.
/// - `password` is the plaintext credential, non-empty, at most
///   [`MAX_PASSWORD_BYTES`] bytes, with caller-provided whitespace retained. It is zeroed on drop and never hashed by callers.
///
/// # Examples
/// ```
/// use sso::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("ada@example.com", "pw").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: Email,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(CredentialsValidationError::PasswordTooLong {
                len: password.len(),
            });
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used as the login key.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signed, self-contained session token scoped to one app.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an encoded token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Encoded token string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}
