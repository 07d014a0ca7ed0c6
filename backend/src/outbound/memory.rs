//! In-process user directory and app registry.
//!
//! [`InMemoryDirectory`] implements the [`UserSaver`], [`UserProvider`], and
//! [`AppProvider`] ports behind a single mutex. The duplicate check and the
//! insert run under the same guard, which gives the write path the atomicity
//! the `UserSaver` contract demands. Useful for embedding, local runs, and
//! end-to-end tests; a durable adapter replaces it in production.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{AppProvider, AppRegistryError, UserDirectoryError, UserProvider, UserSaver};
use crate::domain::{App, AppId, Email, PasswordHash, RequestContext, User, UserId};

#[derive(Debug)]
struct StoredUser {
    user: User,
    is_admin: bool,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<Email, StoredUser>,
    emails_by_id: HashMap<UserId, Email>,
    apps: HashMap<AppId, App>,
    last_user_id: i64,
}

/// Mutex-guarded user directory and app registry.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: Mutex<DirectoryState>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-populated with `apps`.
    pub fn with_apps(apps: impl IntoIterator<Item = App>) -> Self {
        let state = DirectoryState {
            apps: apps.into_iter().map(|app| (app.id(), app)).collect(),
            ..DirectoryState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Register or replace an app. Apps are provisioned out-of-band.
    pub fn insert_app(&self, app: App) -> Result<(), AppRegistryError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| AppRegistryError::connection("directory lock poisoned"))?;
        state.apps.insert(app.id(), app);
        Ok(())
    }

    /// Set or clear a user's administrator flag out-of-band.
    pub fn set_admin(&self, user_id: UserId, is_admin: bool) -> Result<(), UserDirectoryError> {
        let mut state = self.lock_users()?;
        let email = state
            .emails_by_id
            .get(&user_id)
            .cloned()
            .ok_or_else(UserDirectoryError::not_found)?;
        let stored = state
            .users
            .get_mut(&email)
            .ok_or_else(UserDirectoryError::not_found)?;
        stored.is_admin = is_admin;
        Ok(())
    }

    /// Number of registered users.
    pub fn user_count(&self) -> Result<usize, UserDirectoryError> {
        Ok(self.lock_users()?.users.len())
    }

    fn lock_users(&self) -> Result<MutexGuard<'_, DirectoryState>, UserDirectoryError> {
        self.state
            .lock()
            .map_err(|_| UserDirectoryError::connection("directory lock poisoned"))
    }
}

#[async_trait]
impl UserSaver for InMemoryDirectory {
    async fn save_user(
        &self,
        _ctx: &RequestContext,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<UserId, UserDirectoryError> {
        let mut state = self.lock_users()?;
        if state.users.contains_key(email) {
            return Err(UserDirectoryError::duplicate(email.as_str()));
        }

        state.last_user_id += 1;
        let user_id = UserId::new(state.last_user_id);
        let user = User::new(user_id, email.clone(), password_hash.clone());
        state.emails_by_id.insert(user_id, email.clone());
        state.users.insert(
            email.clone(),
            StoredUser {
                user,
                is_admin: false,
            },
        );
        Ok(user_id)
    }
}

#[async_trait]
impl UserProvider for InMemoryDirectory {
    async fn find_user_by_email(
        &self,
        _ctx: &RequestContext,
        email: &Email,
    ) -> Result<User, UserDirectoryError> {
        self.lock_users()?
            .users
            .get(email)
            .map(|stored| stored.user.clone())
            .ok_or_else(UserDirectoryError::not_found)
    }

    async fn is_user_admin(
        &self,
        _ctx: &RequestContext,
        user_id: UserId,
    ) -> Result<bool, UserDirectoryError> {
        let state = self.lock_users()?;
        state
            .emails_by_id
            .get(&user_id)
            .and_then(|email| state.users.get(email))
            .map(|stored| stored.is_admin)
            .ok_or_else(UserDirectoryError::not_found)
    }
}

#[async_trait]
impl AppProvider for InMemoryDirectory {
    async fn find_app_by_id(
        &self,
        _ctx: &RequestContext,
        app_id: AppId,
    ) -> Result<App, AppRegistryError> {
        let state = self
            .state
            .lock()
            .map_err(|_| AppRegistryError::connection("directory lock poisoned"))?;
        state
            .apps
            .get(&app_id)
            .cloned()
            .ok_or_else(|| AppRegistryError::not_found(app_id.get()))
    }
}
