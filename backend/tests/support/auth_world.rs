//! Shared wiring for end-to-end authentication tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sso::domain::password::MIN_COST;
use sso::domain::ports::{TokenIssuer, TokenIssuerError, UserDirectoryError, UserProvider};
use sso::domain::{
    App, AppId, AuthService, Credentials, Email, PasswordHasher, RequestContext, SessionToken,
    SigningSecret, User, UserId,
};
use sso::outbound::memory::InMemoryDirectory;
use sso::outbound::token::JwtTokenIssuer;
use tokio::sync::Notify;

pub const TOKEN_TTL: Duration = Duration::from_secs(30 * 60);
pub const APP_ID: i32 = 1;
pub const APP_SECRET: &[u8] = b"integration-secret";

pub struct AuthWorld {
    pub directory: Arc<InMemoryDirectory>,
    pub issuer: Arc<JwtTokenIssuer>,
    pub service: AuthService,
}

pub fn app_id() -> AppId {
    AppId::new(APP_ID).expect("valid app id")
}

pub fn app() -> App {
    App::new(app_id(), "integration", SigningSecret::new(APP_SECRET.to_vec()))
}

pub fn credentials(email: &str, password: &str) -> Credentials {
    Credentials::try_from_parts(email, password).expect("valid credentials")
}

pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::new(MIN_COST).expect("minimum cost is valid")
}

pub fn world() -> AuthWorld {
    world_with_hasher(fast_hasher())
}

pub fn world_with_hasher(hasher: PasswordHasher) -> AuthWorld {
    let directory = Arc::new(InMemoryDirectory::with_apps([app()]));
    let issuer = Arc::new(JwtTokenIssuer::default());
    let service = AuthService::new(
        directory.clone(),
        directory.clone(),
        directory.clone(),
        issuer.clone(),
        TOKEN_TTL,
    )
    .with_password_hasher(hasher);
    AuthWorld {
        directory,
        issuer,
        service,
    }
}

/// User provider that parks every email lookup until released.
pub struct GatedProvider {
    inner: Arc<InMemoryDirectory>,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedProvider {
    pub fn new(inner: Arc<InMemoryDirectory>) -> Self {
        Self {
            inner,
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl UserProvider for GatedProvider {
    async fn find_user_by_email(
        &self,
        ctx: &RequestContext,
        email: &Email,
    ) -> Result<User, UserDirectoryError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.find_user_by_email(ctx, email).await
    }

    async fn is_user_admin(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
    ) -> Result<bool, UserDirectoryError> {
        self.inner.is_user_admin(ctx, user_id).await
    }
}

/// Token issuer that records how often it was asked to sign.
pub struct CountingIssuer {
    inner: JwtTokenIssuer,
    calls: AtomicUsize,
}

impl CountingIssuer {
    pub fn new() -> Self {
        Self {
            inner: JwtTokenIssuer::default(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenIssuer for CountingIssuer {
    fn issue_token(
        &self,
        user: &User,
        app: &App,
        ttl: Duration,
    ) -> Result<SessionToken, TokenIssuerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.issue_token(user, app, ttl)
    }
}
