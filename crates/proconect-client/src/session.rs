//! Session state: tokens and the logged-in user.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use proconect_types::SessionUser;

use crate::error::ClientError;
use crate::storage::{keys, PersistedState};

/// Auth context backed by [`PersistedState`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<PersistedState>,
}

impl SessionStore {
    pub fn new(state: Arc<PersistedState>) -> Self {
        Self { state }
    }

    /// Session kept in memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(PersistedState::in_memory()))
    }

    pub fn state(&self) -> &Arc<PersistedState> {
        &self.state
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.get(&keys::ACCESS_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state.get(&keys::REFRESH_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Store tokens returned by the backend; `None` leaves the slot as is.
    pub fn set_tokens(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<(), ClientError> {
        if let Some(token) = access_token {
            self.state.set(&keys::ACCESS_TOKEN, &token.to_string())?;
        }
        if let Some(token) = refresh_token {
            self.state.set(&keys::REFRESH_TOKEN, &token.to_string())?;
        }
        Ok(())
    }

    /// Drop both tokens, keeping the stored user.
    ///
    /// Both removals are attempted; the first failure is returned.
    pub fn clear_tokens(&self) -> Result<(), ClientError> {
        let access = self.state.remove(&keys::ACCESS_TOKEN);
        let refresh = self.state.remove(&keys::REFRESH_TOKEN);
        access.and(refresh)
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.state.get(&keys::USUARIO_LOGADO)
    }

    pub fn login(&self, user: &SessionUser) -> Result<(), ClientError> {
        info!(user_id = %user.id, "Session started");
        self.state.set(&keys::USUARIO_LOGADO, user)
    }

    /// Forget the user and tokens.
    pub fn logout(&self) -> Result<(), ClientError> {
        info!("Session ended");
        self.wipe()
    }

    /// Remove tokens and stored user, even when persisting one of them fails.
    pub fn wipe(&self) -> Result<(), ClientError> {
        let tokens = self.clear_tokens();
        let user = self.state.remove(&keys::USUARIO_LOGADO);
        tokens.and(user)
    }

    /// Shallow-merge `patch` into the stored worker profile.
    ///
    /// Returns the updated user, or `None` when nobody is logged in.
    pub fn update_worker_profile(
        &self,
        patch: Map<String, Value>,
    ) -> Result<Option<SessionUser>, ClientError> {
        let Some(mut user) = self.current_user() else {
            return Ok(None);
        };
        user.merge_worker_profile(patch);
        self.state.set(&keys::USUARIO_LOGADO, &user)?;
        Ok(Some(user))
    }

    pub fn set_worker(&self, is_worker: bool) -> Result<Option<SessionUser>, ClientError> {
        let Some(mut user) = self.current_user() else {
            return Ok(None);
        };
        user.is_worker = is_worker;
        self.state.set(&keys::USUARIO_LOGADO, &user)?;
        Ok(Some(user))
    }
}
