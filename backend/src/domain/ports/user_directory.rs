//! Ports for the user directory's write and read paths.
//!
//! The write path ([`UserSaver`]) and read path ([`UserProvider`]) are split
//! so a service can be wired to a primary for writes and a replica for reads.
//! A single adapter commonly implements both.

use async_trait::async_trait;

use crate::domain::{Email, PasswordHash, RequestContext, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// A user with this email already exists.
        Duplicate { email: String } => "user with email {email} already exists",
        /// No user matched the lookup.
        NotFound => "user not found",
        /// Directory connection could not be established.
        Connection { message: String } => "user directory connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user directory query failed: {message}",
    }
}

/// Write path of the user directory.
///
/// Implementations must make the uniqueness check and insert atomic: of any
/// number of concurrent saves for one email, exactly one succeeds and the
/// rest fail with [`UserDirectoryError::Duplicate`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSaver: Send + Sync {
    /// Persist a new user and return its assigned identity.
    async fn save_user(
        &self,
        ctx: &RequestContext,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<UserId, UserDirectoryError>;
}

/// Read path of the user directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Fetch a user by email, failing with
    /// [`UserDirectoryError::NotFound`] on a miss.
    async fn find_user_by_email(
        &self,
        ctx: &RequestContext,
        email: &Email,
    ) -> Result<User, UserDirectoryError>;

    /// Report whether the user holds the administrator flag.
    ///
    /// Fails with [`UserDirectoryError::NotFound`] when the user is unknown.
    async fn is_user_admin(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
    ) -> Result<bool, UserDirectoryError>;
}
