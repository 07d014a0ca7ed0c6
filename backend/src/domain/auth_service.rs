//! Authentication domain service.
//!
//! [`AuthService`] implements the [`Authenticator`] driving port on top of
//! the user directory, app registry, and token issuer driven ports. It holds
//! only immutable configuration, so one instance is shared freely across
//! concurrent requests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use crate::config::{AuthSettings, SettingsError};
use crate::domain::ports::{
    AppProvider, AppRegistryError, Authenticator, TokenIssuer, TokenIssuerError,
    UserDirectoryError, UserProvider, UserSaver,
};
use crate::domain::{
    AppId, AuthError, Credentials, PasswordHashError, PasswordHasher, RequestContext,
    SessionToken, UserId,
};

fn map_save_error(error: UserDirectoryError) -> AuthError {
    match error {
        UserDirectoryError::Duplicate { .. } => {
            warn!(%error, "registration rejected: email already registered");
            AuthError::UserExists
        }
        other => {
            error!(error = %other, "failed to save user");
            AuthError::StorageUnavailable { source: other }
        }
    }
}

fn map_lookup_error(error: UserDirectoryError) -> AuthError {
    error!(%error, "failed to look up user");
    AuthError::StorageUnavailable { source: error }
}

// A missing user surfaces as `InvalidAppId`, not a dedicated not-found kind.
fn map_admin_error(error: UserDirectoryError) -> AuthError {
    match error {
        UserDirectoryError::NotFound => {
            warn!("admin check rejected: user not found");
            AuthError::InvalidAppId
        }
        other => {
            error!(error = %other, "failed to check admin flag");
            AuthError::StorageUnavailable { source: other }
        }
    }
}

fn map_app_error(error: AppRegistryError) -> AuthError {
    error!(%error, "failed to load app");
    AuthError::AppLookupFailed { source: error }
}

fn map_issue_error(error: TokenIssuerError) -> AuthError {
    error!(%error, "failed to issue token");
    AuthError::TokenIssuanceFailed { source: error }
}

fn map_hash_error(error: PasswordHashError) -> AuthError {
    error!(%error, "failed to hash password");
    AuthError::password_hashing(error.to_string())
}

/// Identity service implementing [`Authenticator`].
#[derive(Clone)]
pub struct AuthService {
    user_saver: Arc<dyn UserSaver>,
    user_provider: Arc<dyn UserProvider>,
    app_provider: Arc<dyn AppProvider>,
    token_issuer: Arc<dyn TokenIssuer>,
    hasher: PasswordHasher,
    token_ttl: Duration,
}

impl AuthService {
    /// Create a service with the default bcrypt work factor.
    ///
    /// `token_ttl` is applied to every issued token.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use std::time::Duration;
    /// # use sso::domain::AuthService;
    /// # use sso::outbound::memory::InMemoryDirectory;
    /// # use sso::outbound::token::JwtTokenIssuer;
    /// let directory = Arc::new(InMemoryDirectory::new());
    /// let service = AuthService::new(
    ///     directory.clone(),
    ///     directory.clone(),
    ///     directory,
    ///     Arc::new(JwtTokenIssuer::default()),
    ///     Duration::from_secs(3600),
    /// );
    /// ```
    pub fn new(
        user_saver: Arc<dyn UserSaver>,
        user_provider: Arc<dyn UserProvider>,
        app_provider: Arc<dyn AppProvider>,
        token_issuer: Arc<dyn TokenIssuer>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_saver,
            user_provider,
            app_provider,
            token_issuer,
            hasher: PasswordHasher::default(),
            token_ttl,
        }
    }

    /// Create a service whose TTL and work factor come from settings.
    pub fn from_settings(
        settings: &AuthSettings,
        user_saver: Arc<dyn UserSaver>,
        user_provider: Arc<dyn UserProvider>,
        app_provider: Arc<dyn AppProvider>,
        token_issuer: Arc<dyn TokenIssuer>,
    ) -> Result<Self, SettingsError> {
        let token_ttl = settings.token_ttl()?;
        let hasher = settings.password_hasher()?;
        Ok(Self::new(
            user_saver,
            user_provider,
            app_provider,
            token_issuer,
            token_ttl,
        )
        .with_password_hasher(hasher))
    }

    /// Replace the password hasher.
    #[must_use]
    pub fn with_password_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Lifetime applied to every issued token.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

#[async_trait]
impl Authenticator for AuthService {
    #[instrument(name = "auth.register", skip_all, fields(email = %credentials.email()))]
    async fn register(
        &self,
        ctx: &RequestContext,
        credentials: &Credentials,
    ) -> Result<UserId, AuthError> {
        info!("registering user");

        let password_hash = ctx
            .guard(self.hasher.hash(credentials.password()))
            .await?
            .map_err(map_hash_error)?;

        let user_id = ctx
            .guard(
                self.user_saver
                    .save_user(ctx, credentials.email(), &password_hash),
            )
            .await?
            .map_err(map_save_error)?;

        info!(user_id = %user_id, "user registered");
        Ok(user_id)
    }

    #[instrument(
        name = "auth.login",
        skip_all,
        fields(email = %credentials.email(), app_id = %app_id)
    )]
    async fn login(
        &self,
        ctx: &RequestContext,
        credentials: &Credentials,
        app_id: AppId,
    ) -> Result<SessionToken, AuthError> {
        info!("attempting to log in user");

        let user = match ctx
            .guard(self.user_provider.find_user_by_email(ctx, credentials.email()))
            .await?
        {
            Ok(user) => user,
            Err(UserDirectoryError::NotFound) => {
                warn!("login rejected: unknown email");
                // One bcrypt round so unknown emails cost the same as mismatches.
                let _ = ctx.guard(self.hasher.hash(credentials.password())).await?;
                return Err(AuthError::InvalidCredentials);
            }
            Err(other) => return Err(map_lookup_error(other)),
        };

        match ctx
            .guard(
                self.hasher
                    .verify(credentials.password(), user.password_hash()),
            )
            .await?
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(user_id = %user.id(), "login rejected: password mismatch");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => {
                warn!(user_id = %user.id(), error = %err, "login rejected: unusable stored hash");
                return Err(AuthError::InvalidCredentials);
            }
        }

        let app = ctx
            .guard(self.app_provider.find_app_by_id(ctx, app_id))
            .await?
            .map_err(map_app_error)?;

        ctx.check()?;
        let token = self
            .token_issuer
            .issue_token(&user, &app, self.token_ttl)
            .map_err(map_issue_error)?;

        info!(user_id = %user.id(), app = app.name(), "user logged in");
        Ok(token)
    }

    #[instrument(name = "auth.is_admin", skip_all, fields(user_id = %user_id))]
    async fn is_admin(&self, ctx: &RequestContext, user_id: UserId) -> Result<bool, AuthError> {
        info!("checking if user is admin");

        let is_admin = ctx
            .guard(self.user_provider.is_user_admin(ctx, user_id))
            .await?
            .map_err(map_admin_error)?;

        info!(is_admin, "admin check complete");
        Ok(is_admin)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
