//! Port for minting signed session tokens.
//!
//! Token construction is pure computation over its inputs plus the current
//! time, so the port is synchronous and takes no request context.

use std::time::Duration;

use crate::domain::{App, SessionToken, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token issuers.
    pub enum TokenIssuerError {
        /// Signing the claims failed.
        Signing { message: String } => "token signing failed: {message}",
        /// The expiry could not be computed from the clock and TTL.
        Clock { message: String } => "token expiry could not be computed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Encode and sign a token asserting `user`'s identity for `app`,
    /// expiring `ttl` after issuance.
    fn issue_token(
        &self,
        user: &User,
        app: &App,
        ttl: Duration,
    ) -> Result<SessionToken, TokenIssuerError>;
}
