use super::{
    client::{read_json, ApiClient},
    error::ApiError,
    types::{AuthResponse, AuthUser, CreateUser, LoginRequest, RefreshRequest, RefreshResponse, User},
};
use crate::utils::storage::TokenKey;

impl ApiClient {
    /// Exchanges credentials for a token pair. Bypasses the refresh
    /// interceptor: a 401 here means bad credentials.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .http_client()
            .post(self.url("/auth/login"))
            .form(request)
            .send()
            .await?;
        read_json(response).await
    }

    /// Trades a refresh token for a new access token without touching the
    /// session store.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        let response = self
            .http_client()
            .post(self.url("/auth/refresh"))
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn get_me(&self) -> Result<AuthUser, ApiError> {
        self.get_json("/auth/me").await
    }

    pub async fn register_user(&self, request: &CreateUser) -> Result<User, ApiError> {
        self.post_json("/auth/register", request).await
    }

    pub fn persist_session(&self, tokens: &AuthResponse) -> Result<(), ApiError> {
        self.session()
            .set(TokenKey::AccessToken, &tokens.access_token)?;
        self.session()
            .set(TokenKey::RefreshToken, &tokens.refresh_token)?;
        Ok(())
    }
}
