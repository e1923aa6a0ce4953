use std::sync::Arc;
use tokio::sync::watch;

use crate::{
    api::{ApiClient, ApiError, AuthUser, LoginRequest},
    utils::storage::{clear_session, TokenKey},
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    #[default]
    Uninitialized,
    Loading,
    Authenticated(AuthUser),
    Unauthenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Keeps the session restricted to admin identities.
pub struct SessionGate {
    api: Arc<ApiClient>,
    state: watch::Sender<AuthState>,
}

impl SessionGate {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { api, state }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Startup check: validates a persisted session against `/auth/me`.
    pub async fn initialize(&self) -> AuthState {
        self.transition(AuthState::Loading);

        let token = match self.api.session().get(TokenKey::AccessToken) {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read persisted session");
                None
            }
        };
        if token.is_none() {
            tracing::debug!("no persisted session");
            self.transition(AuthState::Unauthenticated);
            return self.state();
        }

        let next = match self.api.get_me().await {
            Ok(user) if user.role.is_admin() => {
                tracing::info!(user_id = %user.id, "restored admin session");
                AuthState::Authenticated(user)
            }
            Ok(user) => {
                tracing::warn!(user_id = %user.id, role = %user.role, "non-admin session, clearing tokens");
                self.discard_session();
                AuthState::Unauthenticated
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch current user, clearing tokens");
                self.discard_session();
                AuthState::Unauthenticated
            }
        };
        self.transition(next);
        self.state()
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthUser, ApiError> {
        self.transition(AuthState::Loading);

        match self.authenticate(&request).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "admin signed in");
                self.transition(AuthState::Authenticated(user.clone()));
                Ok(user)
            }
            Err(err) => {
                tracing::warn!(error = %err, "sign in rejected");
                self.discard_session();
                self.transition(AuthState::Unauthenticated);
                Err(err)
            }
        }
    }

    async fn authenticate(&self, request: &LoginRequest) -> Result<AuthUser, ApiError> {
        let tokens = self.api.login(request).await?;
        self.api.persist_session(&tokens)?;

        let user = self.api.get_me().await?;
        if !user.role.is_admin() {
            return Err(ApiError::AccessDenied);
        }
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        let result = clear_session(self.api.session()).map_err(ApiError::from);
        self.transition(AuthState::Unauthenticated);
        tracing::info!("signed out");
        result
    }

    fn discard_session(&self) {
        if let Err(err) = clear_session(self.api.session()) {
            tracing::error!(error = %err, "failed to clear session tokens");
        }
    }

    fn transition(&self, next: AuthState) {
        self.state.send_replace(next);
    }
}
