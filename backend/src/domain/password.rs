//! Salted one-way password hashing backed by bcrypt.
//!
//! Hashing is deliberately slow. Both operations run on Tokio's blocking
//! pool so an in-flight hash never stalls the executor or other requests.

use thiserror::Error;
use tokio::task;
use zeroize::Zeroizing;

use super::user::PasswordHash;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;
/// Longest password bcrypt reads; later bytes would be ignored.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Failures raised while hashing or verifying passwords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// Work factor outside bcrypt's accepted range.
    #[error("bcrypt cost {cost} outside {MIN_COST}..={MAX_COST}")]
    InvalidCost { cost: u32 },
    /// Password exceeds [`MAX_PASSWORD_BYTES`].
    #[error("password is {len} bytes; at most {MAX_PASSWORD_BYTES} are allowed")]
    PasswordTooLong { len: usize },
    /// The bcrypt primitive rejected its input.
    #[error("bcrypt failed: {message}")]
    Hash { message: String },
    /// The blocking worker panicked or was cancelled.
    #[error("hashing worker failed: {message}")]
    Worker { message: String },
}

/// bcrypt hasher with a fixed work factor.
///
/// # Examples
/// ```
/// use sso::domain::PasswordHasher;
///
/// assert_eq!(PasswordHasher::default().cost(), bcrypt::DEFAULT_COST);
/// assert!(PasswordHasher::new(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// Build a hasher, validating the work factor.
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordHashError::InvalidCost { cost });
        }
        Ok(Self { cost })
    }

    /// Configured work factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `password` with a fresh random salt.
    ///
    /// Passwords longer than [`MAX_PASSWORD_BYTES`] are rejected rather than
    /// truncated.
    pub async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        ensure_within_limit(password)?;
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;

        let encoded = task::spawn_blocking(move || bcrypt::hash(password.as_bytes(), cost))
            .await
            .map_err(|err| PasswordHashError::Worker {
                message: err.to_string(),
            })?
            .map_err(|err| PasswordHashError::Hash {
                message: err.to_string(),
            })?;

        Ok(PasswordHash::new(encoded.into_bytes()))
    }

    /// Compare `password` against a stored hash.
    ///
    /// A malformed stored hash is reported as an error; callers on the login
    /// path treat it the same as a mismatch.
    pub async fn verify(
        &self,
        password: &str,
        stored: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        ensure_within_limit(password)?;
        let encoded = std::str::from_utf8(stored.as_bytes())
            .map_err(|err| PasswordHashError::Hash {
                message: format!("stored hash is not UTF-8: {err}"),
            })?
            .to_owned();
        let password = Zeroizing::new(password.to_owned());

        task::spawn_blocking(move || bcrypt::verify(password.as_bytes(), &encoded))
            .await
            .map_err(|err| PasswordHashError::Worker {
                message: err.to_string(),
            })?
            .map_err(|err| PasswordHashError::Hash {
                message: err.to_string(),
            })
    }
}

fn ensure_within_limit(password: &str) -> Result<(), PasswordHashError> {
    match password.len() {
        len if len > MAX_PASSWORD_BYTES => Err(PasswordHashError::PasswordTooLong { len }),
        _ => Ok(()),
    }
}
