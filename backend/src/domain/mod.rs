//! Domain primitives, ports, and the authentication service.
//!
//! Purpose: Define strongly typed identity values and the use-case service
//! that registers users, authenticates them for an app, and answers
//! administrator queries. Keep types immutable and document invariants in
//! each type's Rustdoc.
//!
//! Public surface:
//! - AuthError / ErrorCode — error taxonomy surfaced to driving adapters.
//! - AuthService — implementation of the [`ports::Authenticator`] port.
//! - RequestContext — cancellation and deadline carried through every call.
//! - User, App, Credentials — identity values exchanged with ports.

pub mod app;
pub mod auth;
pub mod auth_service;
pub mod context;
pub mod error;
pub mod password;
pub mod ports;
pub mod user;

pub use self::app::{App, AppId, AppValidationError, SigningSecret};
pub use self::auth::{Credentials, CredentialsValidationError, SessionToken};
pub use self::auth_service::AuthService;
pub use self::context::{CancelReason, RequestContext};
pub use self::error::{AuthError, ErrorCode};
pub use self::password::{MAX_PASSWORD_BYTES, PasswordHashError, PasswordHasher};
pub use self::user::{Email, PasswordHash, User, UserId, UserValidationError};
