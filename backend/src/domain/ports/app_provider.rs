//! Port for reading client application metadata.
use async_trait::async_trait;

use crate::domain::{App, AppId, RequestContext};

use super::define_port_error;

define_port_error! {
    /// Errors raised by app registry adapters.
    pub enum AppRegistryError {
        /// No app is registered under this id.
        NotFound { app_id: i32 } => "app {app_id} not found",
        /// Registry connection could not be established.
        Connection { message: String } => "app registry connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "app registry query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppProvider: Send + Sync {
    /// Fetch an app, including its signing secret, by id.
    async fn find_app_by_id(
        &self,
        ctx: &RequestContext,
        app_id: AppId,
    ) -> Result<App, AppRegistryError>;
}
