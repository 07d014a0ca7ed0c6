//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe what the authentication service needs from
//! storage and token signing. Each exposes a strongly typed error so adapters
//! report "duplicate" and "not found" distinctly from other failures. The
//! driving port, [`Authenticator`], is what an RPC layer calls.

mod macros;
pub(crate) use macros::define_port_error;

mod app_provider;
mod authenticator;
mod token_issuer;
mod user_directory;

#[cfg(test)]
pub use app_provider::MockAppProvider;
pub use app_provider::{AppProvider, AppRegistryError};
pub use authenticator::Authenticator;
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenIssuer, TokenIssuerError};
#[cfg(test)]
pub use user_directory::{MockUserProvider, MockUserSaver};
pub use user_directory::{UserDirectoryError, UserProvider, UserSaver};
