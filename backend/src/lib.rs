//! Central authentication service library.
//!
//! Registers users, verifies credentials, issues app-scoped session tokens,
//! and answers administrator queries. Storage and token signing are reached
//! through the ports in [`domain::ports`]; [`outbound`] provides adapters.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

pub use config::AuthSettings;
pub use domain::{AuthError, AuthService, ErrorCode};
