use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::error::ApiError;
use crate::utils::storage::{clear_session, SessionStore, TokenKey};

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Hook invoked when the session cannot be recovered and the operator has to
/// sign in again.
pub trait LoginRedirect: Send + Sync {
    fn redirect_to_login(&self);
}

/// Default redirect: there is no page to navigate to, so it is only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRedirect;

impl LoginRedirect for LogRedirect {
    fn redirect_to_login(&self) {
        tracing::warn!("session ended, sign in again to continue");
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    redirect: Arc<dyn LoginRedirect>,
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Self {
        Self::with_http_client(base_url, session, Client::new())
    }

    /// Uses a preconfigured `reqwest::Client`, e.g. one with timeouts.
    pub fn with_http_client(
        base_url: impl Into<String>,
        session: Arc<dyn SessionStore>,
        client: Client,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            redirect: Arc::new(LogRedirect),
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn with_redirect(mut self, redirect: Arc<dyn LoginRedirect>) -> Self {
        self.redirect = redirect;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request built by `build` with the stored bearer token.
    ///
    /// A 401 triggers at most one refresh and at most one resend; `build` is
    /// called again for the resend.
    pub(crate) async fn send_with_refresh<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        let token = self.session.get(TokenKey::AccessToken)?;
        let response = authorize(build(), token.as_deref()).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(url = %response.url(), "access token rejected, attempting refresh");
        let fresh = self.recover_unauthorized(token.as_deref()).await?;
        let retried = authorize(build(), Some(&fresh)).send().await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %retried.url(), "request rejected again after refresh");
            self.end_session()?;
            return Err(ApiError::SessionExpired);
        }
        Ok(retried)
    }

    /// Obtains a usable access token after `rejected` was refused.
    ///
    /// Refreshes are serialized; a caller that waited on another caller's
    /// refresh reuses its result instead of refreshing again.
    async fn recover_unauthorized(&self, rejected: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        let current = self.session.get(TokenKey::AccessToken)?;
        let refresh_token = self.session.get(TokenKey::RefreshToken)?;
        match current {
            Some(current) if Some(current.as_str()) != rejected => {
                tracing::debug!("access token already replaced by a concurrent refresh");
                return Ok(current);
            }
            // A concurrent caller already ended the session and redirected.
            None if rejected.is_some() && refresh_token.is_none() => {
                tracing::debug!("session already ended by a concurrent refresh");
                return Err(ApiError::SessionExpired);
            }
            _ => {}
        }

        let Some(refresh_token) = refresh_token else {
            tracing::warn!("no refresh token stored, ending session");
            self.session.clear(TokenKey::AccessToken)?;
            self.redirect.redirect_to_login();
            return Err(ApiError::SessionExpired);
        };

        match self.refresh(&refresh_token).await {
            Ok(refreshed) => {
                self.session
                    .set(TokenKey::AccessToken, &refreshed.access_token)?;
                tracing::debug!("access token refreshed");
                Ok(refreshed.access_token)
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, ending session");
                self.end_session()?;
                Err(ApiError::SessionExpired)
            }
        }
    }

    fn end_session(&self) -> Result<(), ApiError> {
        clear_session(self.session.as_ref())?;
        self.redirect.redirect_to_login();
        Ok(())
    }

    pub(crate) async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.send_with_refresh(|| self.client.get(&url)).await?;
        read_json(response).await
    }

    pub(crate) async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        let response = self
            .send_with_refresh(|| self.client.get(&url).query(query))
            .await?;
        read_json(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self
            .send_with_refresh(|| self.client.post(&url).json(body))
            .await?;
        read_json(response).await
    }

    pub(crate) async fn post_empty<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.send_with_refresh(|| self.client.post(&url)).await?;
        read_json(response).await
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self
            .send_with_refresh(|| self.client.put(&url).json(body))
            .await?;
        read_json(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        let response = self.send_with_refresh(|| self.client.delete(&url)).await?;
        expect_success(response).await
    }
}

fn authorize(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Percent-encodes a single path segment such as an entity id.
pub(crate) fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

pub(crate) async fn read_json<T>(response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    if !response.status().is_success() {
        return Err(ApiError::from_response(response).await);
    }
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) async fn expect_success(response: Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(ApiError::from_response(response).await)
    }
}
