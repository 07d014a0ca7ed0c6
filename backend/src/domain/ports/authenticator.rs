//! Driving port for the identity use-cases.
//!
//! In hexagonal terms this is a *driving* port: an RPC adapter calls it to
//! register, log in, and check privileges without knowing the backing
//! infrastructure, and its tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{AppId, AuthError, Credentials, RequestContext, SessionToken, UserId};

/// Domain use-case port for authentication and authorisation.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Register a new user and return the assigned identity.
    async fn register(
        &self,
        ctx: &RequestContext,
        credentials: &Credentials,
    ) -> Result<UserId, AuthError>;

    /// Verify credentials and mint a session token scoped to `app_id`.
    async fn login(
        &self,
        ctx: &RequestContext,
        credentials: &Credentials,
        app_id: AppId,
    ) -> Result<SessionToken, AuthError>;

    /// Report whether `user_id` holds administrator privilege.
    async fn is_admin(&self, ctx: &RequestContext, user_id: UserId) -> Result<bool, AuthError>;
}
