//! Outbound adapters implementing domain ports.
//!
//! - **memory**: mutex-guarded user directory and app registry
//! - **token**: HS256 JWT token issuer
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod token;
