//! JWT token issuer signing HS256 tokens with each app's secret.
//!
//! Tokens are stateless: they carry the user's identity, the requesting app,
//! and an expiry. Whoever consumes a token verifies it with the same app
//! secret; [`JwtTokenIssuer::decode`] is provided for that purpose.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::{Clock, DefaultClock};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ports::{TokenIssuer, TokenIssuerError};
use crate::domain::{App, SessionToken, SigningSecret, User};

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Authenticated user's identity.
    pub uid: i64,
    /// Authenticated user's email.
    pub email: String,
    /// App the token is scoped to.
    pub app_id: i32,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
    /// Issuance time as seconds since the Unix epoch.
    pub iat: i64,
}

/// Failures raised while verifying a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenVerificationError {
    /// Bad signature, wrong algorithm, or undecodable claims.
    #[error("token rejected: {message}")]
    Invalid { message: String },
    /// The token's expiry is not after the current time.
    #[error("token expired at {exp}")]
    Expired { exp: i64 },
}

/// [`TokenIssuer`] producing HS256 JWTs.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    clock: Arc<dyn Clock>,
}

impl Default for JwtTokenIssuer {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl JwtTokenIssuer {
    /// Create an issuer reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    fn expiry(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, TokenIssuerError> {
        if ttl.is_zero() {
            return Err(TokenIssuerError::clock("token ttl must be positive"));
        }
        let delta = TimeDelta::from_std(ttl)
            .map_err(|err| TokenIssuerError::clock(format!("ttl out of range: {err}")))?;
        now.checked_add_signed(delta)
            .ok_or_else(|| TokenIssuerError::clock("expiry overflows the calendar"))
    }

    /// Verify `token` against `secret` and the issuer's clock.
    pub fn decode(
        &self,
        token: &str,
        secret: &SigningSecret,
    ) -> Result<TokenClaims, TokenVerificationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the injected clock.
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = jsonwebtoken::decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|err| TokenVerificationError::Invalid {
            message: err.to_string(),
        })?
        .claims;

        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenVerificationError::Expired { exp: claims.exp });
        }
        Ok(claims)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_token(
        &self,
        user: &User,
        app: &App,
        ttl: Duration,
    ) -> Result<SessionToken, TokenIssuerError> {
        let now = self.clock.utc();
        let expires_at = Self::expiry(now, ttl)?;

        let claims = TokenClaims {
            uid: user.id().get(),
            email: user.email().to_string(),
            app_id: app.id().get(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(app.secret().as_bytes()),
        )
        .map(SessionToken::new)
        .map_err(|err| TokenIssuerError::signing(err.to_string()))
    }
}
