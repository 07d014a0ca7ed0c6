//! Tests for the authentication service's orchestration and error mapping.

use std::sync::Arc;
use std::time::Duration;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockAppProvider, MockTokenIssuer, MockUserProvider, MockUserSaver};
use crate::domain::{App, CancelReason, Email, ErrorCode, PasswordHash, SigningSecret, User};
use crate::domain::password::MIN_COST;

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "correct horse battery staple";
const TTL: Duration = Duration::from_secs(900);

struct Mocks {
    saver: MockUserSaver,
    provider: MockUserProvider,
    apps: MockAppProvider,
    issuer: MockTokenIssuer,
}

impl Mocks {
    fn new() -> Self {
        Self {
            saver: MockUserSaver::new(),
            provider: MockUserProvider::new(),
            apps: MockAppProvider::new(),
            issuer: MockTokenIssuer::new(),
        }
    }

    fn into_service(self) -> AuthService {
        AuthService::new(
            Arc::new(self.saver),
            Arc::new(self.provider),
            Arc::new(self.apps),
            Arc::new(self.issuer),
            TTL,
        )
        .with_password_hasher(fast_hasher())
    }
}

fn fast_hasher() -> PasswordHasher {
    PasswordHasher::new(MIN_COST).expect("minimum cost is valid")
}

fn app_id() -> AppId {
    AppId::new(1).expect("valid app id")
}

fn sample_app() -> App {
    App::new(app_id(), "test-app", SigningSecret::new(b"test-secret".to_vec()))
}

#[fixture]
fn credentials() -> Credentials {
    Credentials::try_from_parts(EMAIL, PASSWORD).expect("valid credentials")
}

#[fixture]
async fn stored_user() -> User {
    let hash = fast_hasher().hash(PASSWORD).await.expect("hash succeeds");
    User::new(UserId::new(7), Email::new(EMAIL).expect("valid email"), hash)
}

#[rstest]
#[tokio::test]
async fn register_saves_hash_not_password(credentials: Credentials) {
    let mut mocks = Mocks::new();
    mocks
        .saver
        .expect_save_user()
        .times(1)
        .withf(|_, email, hash| {
            email.as_str() == EMAIL && hash.as_bytes() != PASSWORD.as_bytes()
        })
        .return_once(|_, _, _| Ok(UserId::new(42)));
    let service = mocks.into_service();

    let user_id = service
        .register(&RequestContext::new(), &credentials)
        .await
        .expect("registration succeeds");

    assert_eq!(user_id, UserId::new(42));
}

#[rstest]
#[case(UserDirectoryError::duplicate(EMAIL), ErrorCode::UserExists)]
#[case(UserDirectoryError::connection("refused"), ErrorCode::StorageUnavailable)]
#[case(UserDirectoryError::query("syntax"), ErrorCode::StorageUnavailable)]
#[tokio::test]
async fn register_maps_directory_errors(
    credentials: Credentials,
    #[case] failure: UserDirectoryError,
    #[case] expected: ErrorCode,
) {
    let mut mocks = Mocks::new();
    mocks
        .saver
        .expect_save_user()
        .times(1)
        .return_once(move |_, _, _| Err(failure));
    let service = mocks.into_service();

    let err = service
        .register(&RequestContext::new(), &credentials)
        .await
        .expect_err("directory failure must surface");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn register_skips_storage_when_cancelled(credentials: Credentials) {
    let mut mocks = Mocks::new();
    mocks.saver.expect_save_user().times(0);
    let service = mocks.into_service();
    let ctx = RequestContext::new();
    ctx.cancel();

    let err = service
        .register(&ctx, &credentials)
        .await
        .expect_err("cancelled request must fail");

    assert_eq!(
        err,
        AuthError::Cancelled {
            reason: CancelReason::Cancelled
        }
    );
}

#[rstest]
#[tokio::test]
async fn login_issues_token_with_configured_ttl(
    credentials: Credentials,
    #[future] stored_user: User,
) {
    let user = stored_user.await;
    let mut mocks = Mocks::new();
    mocks
        .provider
        .expect_find_user_by_email()
        .times(1)
        .return_once(move |_, _| Ok(user));
    mocks
        .apps
        .expect_find_app_by_id()
        .with(mockall::predicate::always(), eq(app_id()))
        .times(1)
        .return_once(|_, _| Ok(sample_app()));
    mocks
        .issuer
        .expect_issue_token()
        .times(1)
        .withf(|user, app, ttl| {
            user.id() == UserId::new(7) && app.id() == app_id() && *ttl == TTL
        })
        .return_once(|_, _, _| Ok(SessionToken::new("signed.token.value")));
    let service = mocks.into_service();

    let token = service
        .login(&RequestContext::new(), &credentials, app_id())
        .await
        .expect("login succeeds");

    assert_eq!(token.as_str(), "signed.token.value");
}

#[rstest]
#[tokio::test]
async fn login_collapses_unknown_email_and_bad_password(
    #[future] stored_user: User,
) {
    let user = stored_user.await;
    let mut unknown = Mocks::new();
    unknown
        .provider
        .expect_find_user_by_email()
        .return_once(|_, _| Err(UserDirectoryError::not_found()));
    unknown.apps.expect_find_app_by_id().times(0);
    unknown.issuer.expect_issue_token().times(0);

    let mut mismatch = Mocks::new();
    mismatch
        .provider
        .expect_find_user_by_email()
        .return_once(move |_, _| Ok(user));
    mismatch.apps.expect_find_app_by_id().times(0);
    mismatch.issuer.expect_issue_token().times(0);

    let ctx = RequestContext::new();
    let wrong = Credentials::try_from_parts(EMAIL, "not the password").expect("valid");
    let unknown_err = unknown
        .into_service()
        .login(&ctx, &wrong, app_id())
        .await
        .expect_err("unknown email fails");
    let mismatch_err = mismatch
        .into_service()
        .login(&ctx, &wrong, app_id())
        .await
        .expect_err("wrong password fails");

    assert_eq!(unknown_err, AuthError::InvalidCredentials);
    assert_eq!(unknown_err, mismatch_err);
}

#[rstest]
#[tokio::test]
async fn login_treats_malformed_hash_as_invalid_credentials(credentials: Credentials) {
    let user = User::new(
        UserId::new(7),
        Email::new(EMAIL).expect("valid email"),
        PasswordHash::new(b"plaintext-leak".to_vec()),
    );
    let mut mocks = Mocks::new();
    mocks
        .provider
        .expect_find_user_by_email()
        .return_once(move |_, _| Ok(user));
    mocks.issuer.expect_issue_token().times(0);

    let err = mocks
        .into_service()
        .login(&RequestContext::new(), &credentials, app_id())
        .await
        .expect_err("malformed hash fails");

    assert_eq!(err.code(), ErrorCode::InvalidCredentials);
}

#[rstest]
#[tokio::test]
async fn login_maps_lookup_failure_to_storage_unavailable(credentials: Credentials) {
    let mut mocks = Mocks::new();
    mocks
        .provider
        .expect_find_user_by_email()
        .return_once(|_, _| Err(UserDirectoryError::connection("pool closed")));

    let err = mocks
        .into_service()
        .login(&RequestContext::new(), &credentials, app_id())
        .await
        .expect_err("lookup failure surfaces");

    assert_eq!(err.code(), ErrorCode::StorageUnavailable);
}

#[rstest]
#[case(AppRegistryError::not_found(99_i32))]
#[case(AppRegistryError::connection("registry offline"))]
#[tokio::test]
async fn login_maps_app_failures_to_app_lookup_failed(
    credentials: Credentials,
    #[future] stored_user: User,
    #[case] failure: AppRegistryError,
) {
    let user = stored_user.await;
    let mut mocks = Mocks::new();
    mocks
        .provider
        .expect_find_user_by_email()
        .return_once(move |_, _| Ok(user));
    mocks
        .apps
        .expect_find_app_by_id()
        .return_once(move |_, _| Err(failure));
    mocks.issuer.expect_issue_token().times(0);

    let err = mocks
        .into_service()
        .login(&RequestContext::new(), &credentials, app_id())
        .await
        .expect_err("app failure surfaces");

    assert_eq!(err.code(), ErrorCode::AppLookupFailed);
}

#[rstest]
#[tokio::test]
async fn login_maps_issuer_failure(credentials: Credentials, #[future] stored_user: User) {
    let user = stored_user.await;
    let mut mocks = Mocks::new();
    mocks
        .provider
        .expect_find_user_by_email()
        .return_once(move |_, _| Ok(user));
    mocks
        .apps
        .expect_find_app_by_id()
        .return_once(|_, _| Ok(sample_app()));
    mocks
        .issuer
        .expect_issue_token()
        .return_once(|_, _, _| Err(TokenIssuerError::signing("empty key")));

    let err = mocks
        .into_service()
        .login(&RequestContext::new(), &credentials, app_id())
        .await
        .expect_err("issuer failure surfaces");

    assert_eq!(err.code(), ErrorCode::TokenIssuanceFailed);
}

#[rstest]
#[tokio::test]
async fn login_issues_no_token_when_cancelled_during_app_lookup(
    credentials: Credentials,
    #[future] stored_user: User,
) {
    let user = stored_user.await;
    let mut mocks = Mocks::new();
    mocks
        .provider
        .expect_find_user_by_email()
        .return_once(move |_, _| Ok(user));
    mocks
        .apps
        .expect_find_app_by_id()
        .times(1)
        .return_once(|ctx, _| {
            ctx.cancel();
            Ok(sample_app())
        });
    mocks.issuer.expect_issue_token().times(0);

    let err = mocks
        .into_service()
        .login(&RequestContext::new(), &credentials, app_id())
        .await
        .expect_err("cancelled login fails");

    assert_eq!(
        err,
        AuthError::Cancelled {
            reason: CancelReason::Cancelled
        }
    );
}

#[rstest]
#[tokio::test]
async fn login_with_unknown_email_stops_when_cancelled_during_lookup(
    credentials: Credentials,
) {
    let mut mocks = Mocks::new();
    mocks
        .provider
        .expect_find_user_by_email()
        .return_once(|ctx, _| {
            ctx.cancel();
            Err(UserDirectoryError::not_found())
        });
    mocks.apps.expect_find_app_by_id().times(0);
    mocks.issuer.expect_issue_token().times(0);

    let err = mocks
        .into_service()
        .login(&RequestContext::new(), &credentials, app_id())
        .await
        .expect_err("cancelled login fails");

    assert_eq!(err.code(), ErrorCode::Cancelled);
}

#[rstest]
#[tokio::test]
async fn login_does_not_touch_collaborators_after_cancel(credentials: Credentials) {
    let mut mocks = Mocks::new();
    mocks.provider.expect_find_user_by_email().times(0);
    mocks.apps.expect_find_app_by_id().times(0);
    mocks.issuer.expect_issue_token().times(0);
    let ctx = RequestContext::new();
    ctx.cancel();

    let err = mocks
        .into_service()
        .login(&ctx, &credentials, app_id())
        .await
        .expect_err("cancelled login fails");

    assert_eq!(err.code(), ErrorCode::Cancelled);
}

#[rstest]
#[case(Ok(true), Ok(true))]
#[case(Ok(false), Ok(false))]
#[case(Err(UserDirectoryError::not_found()), Err(ErrorCode::InvalidAppId))]
#[case(
    Err(UserDirectoryError::query("timeout")),
    Err(ErrorCode::StorageUnavailable)
)]
#[tokio::test]
async fn is_admin_returns_flag_or_mapped_error(
    #[case] outcome: Result<bool, UserDirectoryError>,
    #[case] expected: Result<bool, ErrorCode>,
) {
    let mut mocks = Mocks::new();
    mocks
        .provider
        .expect_is_user_admin()
        .with(mockall::predicate::always(), eq(UserId::new(3)))
        .times(1)
        .return_once(move |_, _| outcome);

    let result = mocks
        .into_service()
        .is_admin(&RequestContext::new(), UserId::new(3))
        .await
        .map_err(|err| err.code());

    assert_eq!(result, expected);
}

#[rstest]
fn from_settings_applies_ttl_and_cost() {
    let settings = AuthSettings {
        token_ttl_secs: 120,
        bcrypt_cost: Some(MIN_COST),
        log_format: None,
    };
    let mocks = Mocks::new();

    let service = AuthService::from_settings(
        &settings,
        Arc::new(mocks.saver),
        Arc::new(mocks.provider),
        Arc::new(mocks.apps),
        Arc::new(mocks.issuer),
    )
    .expect("settings are valid");

    assert_eq!(service.token_ttl(), Duration::from_secs(120));
    assert_eq!(service.hasher.cost(), MIN_COST);
}
